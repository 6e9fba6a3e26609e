use clap::{Args, Parser, Subcommand, ValueEnum};
use enfa::engine::Step;
use enfa::{
    minimize, symbols_from_chars, symbols_from_separated, to_dfa, AutomatonEditor,
    AutomatonError, PresetManager, SpecLoader, Symbol,
};
use log::debug;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

/// Where the automaton comes from. Without `--file` or `--example`, the specification is
/// read from stdin.
#[derive(Args)]
struct Source {
    /// The automaton specification file (JSON)
    #[clap(short, long, conflicts_with = "example")]
    file: Option<PathBuf>,

    /// A built-in example, by name or index (see `examples`)
    #[clap(short, long)]
    example: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Test input strings against an automaton
    Run {
        #[clap(flatten)]
        source: Source,

        /// The input strings; each character is a symbol unless --separator is given
        #[clap(required = true)]
        input: Vec<String>,

        /// Split inputs into multi-character symbols on this separator
        #[clap(short, long)]
        separator: Option<String>,

        /// Print the state set after each step
        #[clap(short = 'd', long)]
        debug: bool,
    },
    /// Build an automaton from scratch and print its specification
    Build {
        /// Number of non-accepting states to add after q0
        #[clap(short, long, default_value_t = 0)]
        state: usize,

        /// Number of accepting states to add after the non-accepting ones
        #[clap(short, long, default_value_t = 0)]
        accepting: usize,

        /// A transition between display ids, as FROM:TO:SYMBOL (empty SYMBOL is epsilon)
        #[clap(short, long, value_parser = parse_transition)]
        transition: Vec<(u32, u32, Symbol)>,
    },
    /// Print the visualization graph of an automaton
    Graph {
        #[clap(flatten)]
        source: Source,

        #[clap(long, value_enum, default_value_t = GraphFormat::Json)]
        format: GraphFormat,
    },
    /// Convert an automaton into an equivalent deterministic one
    Convert {
        #[clap(flatten)]
        source: Source,

        #[clap(long, value_enum, default_value_t = Target::Dfa)]
        to: Target,
    },
    /// List the built-in example automata
    Examples,
}

#[derive(Clone, Copy, ValueEnum)]
enum GraphFormat {
    Json,
    Dot,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Dfa,
    Minimal,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = execute(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn execute(command: Command) -> Result<(), AutomatonError> {
    match command {
        Command::Run {
            source,
            input,
            separator,
            debug,
        } => {
            let editor = load_automaton(&source)?;

            for text in &input {
                let symbols = match &separator {
                    Some(separator) => symbols_from_separated(text, separator),
                    None => symbols_from_chars(text),
                };

                let accepted = if debug {
                    trace_run(&editor, &symbols)
                } else {
                    editor.accepts(&symbols)
                };

                println!(
                    "{:?}: {}",
                    text,
                    if accepted { "accepted" } else { "rejected" }
                );
            }
        }
        Command::Build {
            state,
            accepting,
            transition,
        } => {
            let mut editor = AutomatonEditor::new();

            for _ in 0..state {
                editor.add_state(false)?;
            }
            for _ in 0..accepting {
                editor.add_state(true)?;
            }
            for (from, to, symbol) in transition {
                editor.add_transition(from, to, symbol)?;
            }

            println!("{}", editor.export_json()?);
        }
        Command::Graph { source, format } => {
            let editor = load_automaton(&source)?;

            match format {
                GraphFormat::Json => println!("{:#}", editor.graph().to_json()),
                GraphFormat::Dot => println!("{}", editor.graph().to_dot()),
            }
        }
        Command::Convert { source, to } => {
            let editor = load_automaton(&source)?;

            let converted = match to {
                Target::Dfa => to_dfa(editor.automaton())?,
                Target::Minimal => minimize(editor.automaton())?,
            };

            println!("{}", AutomatonEditor::from(converted).export_json()?);
        }
        Command::Examples => {
            for index in 0..PresetManager::get_preset_count() {
                let info = PresetManager::get_preset_info(index)?;
                println!(
                    "{:>2}. {} ({} states, {} transitions, {} accepting)",
                    info.index,
                    info.name,
                    info.state_count,
                    info.transition_count,
                    info.accepting_count
                );
            }
        }
    }

    Ok(())
}

/// Loads the automaton from a file, a built-in example, or stdin.
fn load_automaton(source: &Source) -> Result<AutomatonEditor, AutomatonError> {
    if let Some(path) = &source.file {
        SpecLoader::load_spec(path)
    } else if let Some(example) = &source.example {
        let preset = match example.parse::<usize>() {
            Ok(index) => PresetManager::get_preset_by_index(index)?,
            Err(_) => PresetManager::get_preset_by_name(example)?,
        };
        debug!("Using built-in example '{}'", preset.name);

        Ok(AutomatonEditor::from(preset.automaton))
    } else if atty::isnt(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| AutomatonError::FileError(format!("Failed to read from stdin: {}", e)))?;

        SpecLoader::load_spec_from_string(&buffer)
    } else {
        Err(AutomatonError::FileError(
            "No automaton given; use --file, --example or pipe a specification on stdin"
                .to_string(),
        ))
    }
}

/// Runs the input one symbol at a time, printing the state set after every step.
fn trace_run(editor: &AutomatonEditor, symbols: &[Symbol]) -> bool {
    let mut simulator = editor.simulator();

    let print_states = |step: usize, states: &enfa::StateSet<'_>| {
        let states: Vec<&str> = states.iter().copied().collect();
        println!("Step: {}, States: {{{}}}", step, states.join(", "));
    };

    print_states(simulator.step_count(), simulator.current_states());

    for symbol in symbols {
        let step = simulator.step(symbol);
        print_states(simulator.step_count(), simulator.current_states());

        if step == Step::Dead {
            println!("No state left after '{}'.", symbol);
            break;
        }
    }

    simulator.verdict().is_accepted()
}

fn parse_transition(value: &str) -> Result<(u32, u32, Symbol), String> {
    let mut parts = value.splitn(3, ':');

    let (Some(from), Some(to), Some(symbol)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected FROM:TO:SYMBOL, got '{}'", value));
    };

    let from = from
        .parse()
        .map_err(|_| format!("invalid display id '{}'", from))?;
    let to = to
        .parse()
        .map_err(|_| format!("invalid display id '{}'", to))?;

    Ok((from, to, Symbol::token(symbol)))
}
