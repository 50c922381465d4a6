use sonicbrowse::config;
use sonicbrowse::page::{COLUMNS, PlaylistRow, PlaylistsPage};
use sonicbrowse::source::JsonFileSource;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct CliArgs {
    source: Option<PathBuf>,
    search: Option<String>,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let args = parse_args(std::env::args().skip(1).collect())?;

    let mut state = config::load_state()?;
    if let Some(source) = args.source {
        state.source = Some(source);
    }
    if let Some(search) = args.search {
        state.playlists_page.search_text = search;
    }
    let Some(source_path) = state.source.clone() else {
        anyhow::bail!("no playlist source configured, pass --source path/to/getPlaylists.json");
    };

    let mut page = PlaylistsPage::restore(&state.playlists_page, JsonFileSource::new(source_path));
    page.wait_for_load();
    print_table(page.rows());

    state.playlists_page = page.save();
    config::save_state(&state)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_args(args: Vec<String>) -> anyhow::Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut index = 0;
    while index < args.len() {
        match args[index].as_str() {
            "--source" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--source requires a path");
                };
                if value.trim().is_empty() {
                    anyhow::bail!("--source cannot be empty");
                }
                out.source = Some(PathBuf::from(value.trim()));
            }
            "--search" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    anyhow::bail!("--search requires a query (use \"\" to clear)");
                };
                out.search = Some(value.clone());
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
        index += 1;
    }
    Ok(out)
}

fn print_table(rows: &[PlaylistRow]) {
    let mut widths = COLUMNS.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", format_line(COLUMNS, &widths));
    for row in rows {
        println!("{}", format_line(row.cells(), &widths));
    }
    if rows.is_empty() {
        println!("(no playlists)");
    }
}

fn format_line(cells: [&str; 4], widths: &[usize; 4]) -> String {
    let [name, description, owner, count] = cells;
    format!(
        "{name:<w0$}  {description:<w1$}  {owner:<w2$}  {count:>w3$}",
        w0 = widths[0],
        w1 = widths[1],
        w2 = widths[2],
        w3 = widths[3],
    )
}

fn print_help() {
    println!("sonicbrowse");
    println!("  --source path     Saved getPlaylists JSON response to browse");
    println!("  --search text     Filter by name, description or owner");
}
