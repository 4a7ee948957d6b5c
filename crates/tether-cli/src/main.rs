use serde::Serialize;
use std::io::Read;
use tether_core::Diagram;
use tether_render::replay::{ReplayScript, run_replay};
use tether_render::svg::render_overlay_svg;
use tether_render::{EngineOptions, LayoutSnapshot, OverlayFrame};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Diagram(tether_core::Error),
    Render(tether_render::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Diagram(err) => write!(f, "invalid diagram: {err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<tether_core::Error> for CliError {
    fn from(value: tether_core::Error) -> Self {
        Self::Diagram(value)
    }
}

impl From<tether_render::Error> for CliError {
    fn from(value: tether_render::Error) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    #[default]
    Render,
    Geometry,
    Validate,
    Replay,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    diagram: Option<String>,
    options: Option<String>,
    anchor_boxes: bool,
    pretty: bool,
    out: Option<String>,
}

fn usage() -> &'static str {
    "tether-cli\n\
\n\
USAGE:\n\
  tether-cli [render] [--diagram <diagram.json>] [--options <options.json>] [--anchor-boxes] [--out <path>] [<layout.json>|-]\n\
  tether-cli geometry [--diagram <diagram.json>] [--options <options.json>] [--pretty] [<layout.json>|-]\n\
  tether-cli validate [<diagram.json>|-]\n\
  tether-cli replay [--diagram <diagram.json>] [--pretty] [<script.json>|-]\n\
\n\
NOTES:\n\
  - If the input path is omitted or '-', input is read from stdin.\n\
  - Without --diagram, the built-in substitution/elimination tree is used.\n\
  - render prints the overlay SVG to stdout by default; use --out to write a file.\n\
  - geometry prints the measured frame (segments, labels, unresolved edges) as JSON.\n\
  - replay prints one frame per script step as a JSON array.\n\
  - Set TETHER_LOG (e.g. TETHER_LOG=debug) to see engine logs on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "geometry" => args.command = Command::Geometry,
            "validate" => args.command = Command::Validate,
            "replay" => args.command = Command::Replay,
            "--pretty" => args.pretty = true,
            "--anchor-boxes" => args.anchor_boxes = true,
            "--diagram" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.diagram = Some(path.clone());
            }
            "--options" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.options = Some(path.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn load_diagram(path: Option<&str>) -> Result<Diagram, CliError> {
    match path {
        None => Ok(tether_core::decision_tree::substitution_elimination()),
        Some(path) => Ok(Diagram::from_json_str(&std::fs::read_to_string(path)?)?),
    }
}

fn load_options(path: Option<&str>) -> Result<EngineOptions, CliError> {
    match path {
        None => Ok(EngineOptions::default()),
        Some(path) => Ok(EngineOptions::from_json_str(&std::fs::read_to_string(
            path,
        )?)?),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("TETHER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Validate => {
            let text = read_input(args.input.as_deref())?;
            let diagram = Diagram::from_json_str(&text)?;
            println!(
                "ok: {} nodes, {} edges ({} labelled)",
                diagram.nodes().len(),
                diagram.edges().len(),
                diagram.labeled_edge_count()
            );
            Ok(())
        }
        Command::Render | Command::Geometry => {
            let diagram = load_diagram(args.diagram.as_deref())?;
            let mut options = load_options(args.options.as_deref())?;
            if args.anchor_boxes {
                options.overlay.include_anchor_boxes = true;
            }
            let layout = LayoutSnapshot::from_json_str(&read_input(args.input.as_deref())?)?;
            let frame = OverlayFrame::measure(&diagram, &layout, &options);
            if !frame.unresolved_edges.is_empty() {
                tracing::info!(
                    unresolved = frame.unresolved_edges.len(),
                    "some edges were not drawn"
                );
            }

            if matches!(args.command, Command::Geometry) {
                return write_json(&frame, args.pretty);
            }
            let svg = render_overlay_svg(&frame, &options.overlay);
            write_text(&svg, args.out.as_deref())
        }
        Command::Replay => {
            let diagram = load_diagram(args.diagram.as_deref())?;
            let script = ReplayScript::from_json_str(&read_input(args.input.as_deref())?)?;
            let records = run_replay(diagram, script)?;
            write_json(&records, args.pretty)
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("tether-cli")
            .chain(args.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn defaults_to_render_from_stdin() {
        let args = parse_args(&argv(&[])).unwrap();
        assert!(matches!(args.command, Command::Render));
        assert!(args.input.is_none());
        assert!(args.diagram.is_none());
    }

    #[test]
    fn parses_flags_and_input() {
        let args = parse_args(&argv(&[
            "geometry",
            "--diagram",
            "d.json",
            "--pretty",
            "layout.json",
        ]))
        .unwrap();
        assert!(matches!(args.command, Command::Geometry));
        assert_eq!(args.diagram.as_deref(), Some("d.json"));
        assert!(args.pretty);
        assert_eq!(args.input.as_deref(), Some("layout.json"));
    }

    #[test]
    fn rejects_unknown_flags_and_extra_inputs() {
        assert!(matches!(
            parse_args(&argv(&["--bogus"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["a.json", "b.json"])),
            Err(CliError::Usage(_))
        ));
        assert!(matches!(
            parse_args(&argv(&["render", "--out"])),
            Err(CliError::Usage(_))
        ));
    }
}
