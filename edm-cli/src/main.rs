// Command-line interface for edm
//
// This binary converts documents between the formats the document model knows
// about, and dumps the semantic tree for inspection.
//
// Converting:
//
// The conversion needs a from and to pair. The from is auto-detected from the file extension,
// while being overwrittable by an explicit --from flag. The to falls back to
// `convert.default_format` from the configuration.
// Usage:
//  edm <input> [--to <format>] [--from <format>] [--output <file>]          - Convert between formats (default)
//  edm convert <input> [--to <format>] [--from <format>] [--output <file>]  - Same as above (explicit)
//  edm inspect <path> [tree|json]                                          - Dump the tree (defaults to "tree")
//  edm --list-formats                                                      - List available formats
//
// Extra Parameters:
//
// Import settings can be overridden using --extra-<key> <value>. The CLI layer strips the
// "extra-" prefix and sets `import.<key>` (dashes become underscores) on top of the
// configuration files.
// Example:
//  edm notes.md --to markdown --extra-soft-break newline --extra-max-depth 32

use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use edm_config::{EdmConfig, Loader};
use edm_core::{DocModel, FormatRegistry, Options};
use std::collections::HashMap;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Inspect views, each backed by an export-only or two-way format.
const INSPECT_VIEWS: &[&str] = &["tree", "json"];

/// Keys of the `import` configuration section that `--extra-*` may set.
const IMPORT_KEYS: &[&str] = &["soft_break", "max_depth", "gfm"];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key_opt = if let Some(key) = arg.strip_prefix("--extra-") {
            Some(key)
        } else {
            arg.strip_prefix("--extras-")
        };

        if let Some(key) = key_opt {
            let has_value = args.get(i + 1).is_some_and(|next| !next.starts_with('-'));

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("edm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting documents through the edm document model")
        .long_about(
            "edm reads Markdown (or the JSON tree transport) into a validated semantic tree\n\
            and writes it back out as Markdown, HTML, JSON or a debug dump.\n\n\
            Commands:\n  \
            - convert: Transform between document formats (default)\n  \
            - inspect: Dump the semantic tree\n\n\
            Extra Parameters:\n  \
            Use --extra-<name> [value] to override an import setting.\n  \
            Boolean settings can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            edm notes.md                             # Convert to the default format (html)\n  \
            edm notes.md --to markdown               # Normalize the Markdown\n  \
            edm notes.md --to html -o notes.html     # Convert to an HTML file\n  \
            edm inspect notes.md                     # View the tree\n  \
            edm notes.md --extra-soft-break newline  # Keep soft line breaks",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an edm.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log debug events to stderr")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand(
            Command::new("inspect")
                .about("Dump the semantic tree of a document")
                .long_about(
                    "View the normalized tree a document imports to.\n\n\
                    Views:\n  \
                    - tree:  indented debug dump (default)\n  \
                    - json:  the JSON tree transport\n\n\
                    Examples:\n  \
                    edm inspect notes.md         # Debug dump\n  \
                    edm inspect notes.md json    # JSON transport",
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the document")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("view")
                        .help("View to print. Defaults to 'tree'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(INSPECT_VIEWS))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between different formats.\n\n\
                    Supported formats:\n  \
                    - markdown: CommonMark with GitHub strikethrough and autolinks (.md)\n  \
                    - html:     HTML fragment, export only (.html)\n  \
                    - json:     JSON tree transport (.json)\n  \
                    - tree:     Indented debug dump, export only\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    edm convert notes.md --to html              # Convert to HTML (stdout)\n  \
                    edm convert tree.json --to markdown -o a.md # JSON tree back to Markdown\n  \
                    edm notes.md --to json                      # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (defaults to convert.default_format)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .long_help(
                            "Path to write the converted output.\n\n\
                            If not specified, output is written to stdout.\n\
                            Nothing is written when the conversion fails.",
                        )
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let (cleaned_args, extra_params) = parse_extra_args(&args);

    // If no subcommand is provided, inject "convert"
    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "help"
            {
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    init_logging(matches.get_flag("verbose"));

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let config = load_cli_config(
        matches.get_one::<String>("config").map(|s| s.as_str()),
        &extra_params,
    );
    let model = build_model(&config);

    match matches.subcommand() {
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let view = sub_matches
                .get_one::<String>("view")
                .map(|s| s.as_str())
                .unwrap_or("tree");
            handle_inspect_command(&model, path, view);
        }
        Some(("convert", sub_matches)) => handle_convert_command(&model, &config, sub_matches),
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Install the stderr subscriber. `RUST_LOG` wins over the default level.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_model(config: &EdmConfig) -> DocModel {
    let options = Options::from(&config.import);
    DocModel::with_options(options).unwrap_or_else(|e| {
        eprintln!("Failed to set up the document model: {e}");
        std::process::exit(1);
    })
}

/// Handle the inspect command
fn handle_inspect_command(model: &DocModel, path: &str, view: &str) {
    let formats = FormatRegistry::default();
    let from = formats
        .detect_format_from_filename(path)
        .unwrap_or_else(|| "markdown".to_string());
    let source = read_input(path);

    let output = formats
        .parse(model, &source, &from)
        .and_then(|tree| formats.serialize(model, &tree, view))
        .unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });
    print!("{output}");
}

/// Handle the convert command
fn handle_convert_command(model: &DocModel, config: &EdmConfig, sub_matches: &ArgMatches) {
    let formats = FormatRegistry::default();
    let input = sub_matches
        .get_one::<String>("input")
        .expect("input is required");

    // Auto-detect --from if not provided
    let from = match sub_matches.get_one::<String>("from") {
        Some(f) => f.to_string(),
        None => match formats.detect_format_from_filename(input) {
            Some(detected) => detected,
            None => {
                eprintln!("Error: Could not detect format from filename '{input}'");
                eprintln!("Please specify --from explicitly");
                std::process::exit(1);
            }
        },
    };
    let to = sub_matches
        .get_one::<String>("to")
        .cloned()
        .unwrap_or_else(|| config.convert.default_format.clone());

    for name in [&from, &to] {
        if let Err(e) = formats.get(name) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
    debug!(input, from = %from, to = %to, "converting");

    let source = read_input(input);
    let tree = formats.parse(model, &source, &from).unwrap_or_else(|e| {
        eprintln!("Parse error: {e}");
        std::process::exit(1);
    });
    let result = formats.serialize(model, &tree, &to).unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match sub_matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, result).unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => print!("{result}"),
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let formats = FormatRegistry::default();
    println!("Available formats:\n");
    for name in formats.list_formats() {
        let Ok(format) = formats.get(&name) else {
            continue;
        };
        let direction = match (format.supports_parsing(), format.supports_serialization()) {
            (true, true) => "import/export",
            (true, false) => "import",
            (false, true) => "export",
            (false, false) => "-",
        };
        println!("  {name:<10} {direction:<14} {}", format.description());
    }
}

fn read_input(path: &str) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{path}': {e}");
        std::process::exit(1);
    })
}

fn load_cli_config(explicit_path: Option<&str>, extra_params: &HashMap<String, String>) -> EdmConfig {
    let loader = Loader::new().with_optional_file("edm.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };
    let loader = apply_config_overrides(loader, extra_params).unwrap_or_else(|err| {
        eprintln!("{err}");
        std::process::exit(1);
    });
    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Layer `--extra-*` values over the `import` section.
fn apply_config_overrides(
    mut loader: Loader,
    extra_params: &HashMap<String, String>,
) -> Result<Loader, String> {
    for (raw_key, value) in extra_params {
        let key = import_key(raw_key)
            .ok_or_else(|| format!("Unknown parameter --extra-{raw_key}"))?;
        loader = loader
            .set_override(&format!("import.{key}"), value.as_str())
            .map_err(|e| format!("Invalid value '{value}' for --extra-{raw_key}: {e}"))?;
    }
    Ok(loader)
}

fn import_key(raw: &str) -> Option<String> {
    let key = raw.replace('-', "_");
    IMPORT_KEYS.contains(&key.as_str()).then_some(key)
}
