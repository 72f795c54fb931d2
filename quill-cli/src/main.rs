// Command-line interface for quill
//
// Renders a document tree, serialized as JSON by a markup parser, with one of the quill writers.
//
// Usage:
//  quill <input.json> --to <format> [--output <file>]          - Render a document (default)
//  quill convert <input.json> --to <format> [--output <file>]  - Same as above (explicit)
//  quill --list-formats                                        - List available formats
//
// The target format can be omitted when the output file extension identifies it
// (`-o paper.tex` selects latex).
//
// Configuration:
//
// Settings come from the built-in defaults, then ./quill.toml if present, then the file given
// with --config. Individual settings can be overridden with --extra-<setting> <value>, e.g.
//  quill talk.json --to slides -o talk.html --extra-theme big-black --extra-theme-dir ./themes
//
// Logging goes to stderr; the default level is `warn`, use RUST_LOG to change it.

use clap::{Arg, ArgAction, Command, ValueHint};
use env_logger::Env;
use quill_babel::publish::{publish, PublishArtifact, PublishSpec};
use quill_babel::{FormatRegistry, Node, Settings, TocBacklinks};
use quill_config::Loader;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut iter = args.iter().peekable();

    while let Some(arg) = iter.next() {
        let Some(key) = arg.strip_prefix("--extra-") else {
            cleaned_args.push(arg.clone());
            continue;
        };
        let value = match iter.peek() {
            Some(next) if !next.starts_with('-') => iter.next().cloned(),
            _ => None,
        };
        extra_params.insert(
            key.to_string(),
            value.unwrap_or_else(|| "true".to_string()),
        );
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("quill")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render document trees as LaTeX, XHTML or S5 slideshows")
        .long_about(
            "quill renders a parsed document tree (JSON) with one of its writers.\n\n\
            Formats:\n  \
            - latex:  LaTeX 2e source (.tex)\n  \
            - html:   XHTML 1.0 page (.html)\n  \
            - slides: S5 slideshow; theme files are copied next to the output\n\n\
            Extra Parameters:\n  \
            Use --extra-<setting> [value] to override a configured setting.\n  \
            Boolean settings can omit the value (defaults to 'true').\n\n\
            Examples:\n  \
            quill doc.json --to latex                        # LaTeX to stdout\n  \
            quill doc.json -o doc.tex                        # format from the extension\n  \
            quill talk.json --to slides -o talk.html --extra-theme-dir ./themes",
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
                .help("Path to a quill.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Render a document tree (default command)")
                .arg(
                    Arg::new("input")
                        .help("Input file (JSON document tree)")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (detected from --output if omitted)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // `quill <input> ...` is `quill convert <input> ...`
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
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

    if matches.get_flag("list-formats") {
        handle_list_formats_command();
        return;
    }

    let mut settings = load_cli_settings(matches.get_one::<String>("config").map(|s| s.as_str()));
    if let Err(err) = apply_setting_overrides(&mut settings, &mut extra_params) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
    for key in extra_params.keys() {
        log::warn!("ignoring unknown setting --extra-{key}");
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .map(String::as_str)
                .unwrap_or_default();
            let output = sub_matches.get_one::<String>("output").map(|s| s.as_str());
            let to = match sub_matches.get_one::<String>("to") {
                Some(to) => to.clone(),
                None => detect_target(output),
            };
            handle_convert_command(input, &to, output, settings);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

fn detect_target(output: Option<&str>) -> String {
    let registry = FormatRegistry::default();
    match output.and_then(|path| registry.detect_format_from_filename(path)) {
        Some(detected) => detected,
        None => {
            eprintln!("Error: no target format given and none could be detected from the output file");
            eprintln!("Please specify --to explicitly");
            std::process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(input: &str, to: &str, output: Option<&str>, settings: Settings) {
    let registry = FormatRegistry::default();
    if let Err(e) = registry.get(to) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let source = fs::read_to_string(input).unwrap_or_else(|e| {
        eprintln!("Error reading file '{input}': {e}");
        std::process::exit(1);
    });
    let doc: Node = serde_json::from_str(&source).unwrap_or_else(|e| {
        eprintln!("Invalid document tree in '{input}': {e}");
        std::process::exit(1);
    });

    let mut spec = PublishSpec::new(&doc, to).with_settings(settings);
    if let Some(path) = output {
        spec = spec.with_output_path(path);
    }
    let result = publish(spec).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(1);
    });

    for dependency in &result.dependencies {
        log::info!("depends on {}", dependency.display());
    }
    match result.artifact {
        PublishArtifact::InMemory(text) => print!("{text}"),
        PublishArtifact::File(path) => log::info!("wrote {}", path.display()),
    }
}

fn handle_list_formats_command() {
    println!("Available formats:\n");
    let registry = FormatRegistry::default();
    for (name, description) in registry.describe_formats() {
        println!("  {name:<8} {description}");
    }
}

fn load_cli_settings(explicit_path: Option<&str>) -> Settings {
    let loader = Loader::new().with_optional_file("quill.toml");
    let loader = if let Some(path) = explicit_path {
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().map(Settings::from).unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Apply recognised `--extra-*` settings, removing them from `extra_params`.
fn apply_setting_overrides(
    settings: &mut Settings,
    extra_params: &mut HashMap<String, String>,
) -> Result<(), String> {
    if let Some(raw) = extra_params.remove("theme") {
        settings.theme = Some(raw);
    }
    if let Some(raw) = extra_params.remove("theme-url") {
        // an explicit URL on the command line replaces the configured theme
        settings.theme = None;
        settings.theme_url = Some(raw);
    }
    if let Some(raw) = extra_params.remove("theme-dir") {
        settings.theme_dirs.push(PathBuf::from(raw));
    }
    if let Some(raw) = extra_params.remove("language") {
        settings.language_code = raw;
    }
    if let Some(raw) = extra_params.remove("document-class") {
        settings.document_class = raw;
    }
    if let Some(raw) = extra_params.remove("document-options") {
        settings.document_options = raw;
    }
    if let Some(raw) = extra_params.remove("stylesheet") {
        settings.stylesheets.push(raw);
    }
    if let Some(raw) = extra_params.remove("initial-header-level") {
        settings.initial_header_level = raw
            .parse()
            .map_err(|_| format!("--extra-initial-header-level expects a number, got '{raw}'"))?;
    }
    if let Some(raw) = extra_params.remove("toc-backlinks") {
        settings.toc_backlinks = match raw.as_str() {
            "entry" => TocBacklinks::Entry,
            "top" => TocBacklinks::Top,
            "none" => TocBacklinks::None,
            other => return Err(format!("--extra-toc-backlinks expects entry, top or none, got '{other}'")),
        };
    }

    let flags: [(&str, &mut bool); 5] = [
        ("overwrite-theme-files", &mut settings.overwrite_theme_files),
        ("current-slide", &mut settings.current_slide_indicator),
        ("use-toc-linking", &mut settings.use_toc_linking),
        ("use-section-numbering", &mut settings.use_section_numbering),
        ("use-citation-shorthand", &mut settings.use_citation_shorthand),
    ];
    for (key, field) in flags {
        if let Some(raw) = extra_params.remove(key) {
            *field = parse_bool_arg(key, &raw)?;
        }
    }
    Ok(())
}

fn parse_bool_arg(flag: &str, raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(format!("--extra-{flag} expects a boolean, got '{raw}'")),
    }
}
