use std::fs;
use std::io::{self, Read, Write};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use portmatch_core::Storefront;
use portmatch_match::{MatchKind, match_titles_par};
use portmatch_report::{CATALOG_PAGE_URL, HtmlWriter, JsonWriter, Report, ReportWriter};
use portmatch_sources::{PortmasterClient, SourceError, SteamClient, parser_for};

use super::{load_settings, open_cache, runtime};
use crate::cli_types::{OutputArgs, ReportFormat};
use crate::error::CliError;
use crate::spinner;

/// Read an exported library from a file, or stdin for `-`.
fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut raw = String::new();
        io::stdin().read_to_string(&mut raw)?;
        return Ok(raw);
    }
    fs::read_to_string(input)
        .map_err(|e| CliError::load(format!("Cannot read library file {}: {}", input, e)))
}

/// Compare a storefront library against the PortMaster catalog.
pub(crate) fn run_compare(
    storefront: Storefront,
    input: &str,
    output: &OutputArgs,
    no_cache: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let settings = load_settings()?;
    let cache = open_cache(&settings, no_cache);
    let parser = parser_for(storefront);
    let describe = |e: SourceError| CliError::load(parser.describe_error(&e));

    let portmaster =
        PortmasterClient::new(settings.ports_url.clone(), cache.clone()).map_err(describe)?;
    let rt = runtime()?;

    let loaded = match storefront {
        Storefront::Steam => {
            let key = settings.require_api_key().map_err(describe)?;
            let steam = SteamClient::new(key, cache.clone()).map_err(describe)?;
            let pb = spinner::start("Fetching Steam library and PortMaster catalog...", quiet);
            let result = rt.block_on(async {
                tokio::try_join!(steam.fetch_library(input), portmaster.fetch_catalog())
            });
            pb.finish_and_clear();
            result
        }
        Storefront::Epic | Storefront::Gog => {
            let raw = read_input(input)?;
            match parser.parse(&raw) {
                Ok(library) => {
                    let pb = spinner::start("Fetching PortMaster catalog...", quiet);
                    let catalog = rt.block_on(portmaster.fetch_catalog());
                    pb.finish_and_clear();
                    catalog.map(|catalog| (library, catalog))
                }
                Err(e) => Err(e),
            }
        }
    };
    let (library, catalog) = loaded.map_err(describe)?;

    log::debug!(
        "Matching {} {} titles against {} ports",
        library.len(),
        storefront,
        catalog.len()
    );
    let records = match_titles_par(&library, &catalog);
    let report = Report::build(storefront, &library, &catalog, records);

    match output.format {
        ReportFormat::Text => {
            let lines = text_lines(&report);
            match &output.output {
                Some(path) => {
                    let plain: Vec<String> =
                        lines.iter().map(|l| strip_ansi_escapes::strip_str(l)).collect();
                    fs::write(path, plain.join("\n") + "\n")?;
                    log_written("text", path);
                }
                None => {
                    for line in lines {
                        log::info!("{}", line);
                    }
                }
            }
        }
        ReportFormat::Json => write_report(&JsonWriter, &report, output)?,
        ReportFormat::Html => write_report(&HtmlWriter::new(), &report, output)?,
    }
    Ok(())
}

/// Whether a JSON or HTML report will be written to stdout. Log output must
/// then stay off stdout.
pub(crate) fn report_on_stdout(output: &OutputArgs) -> bool {
    output.format != ReportFormat::Text && output.output.is_none()
}

fn write_report(
    writer: &dyn ReportWriter,
    report: &Report,
    output: &OutputArgs,
) -> Result<(), CliError> {
    match &output.output {
        Some(path) => {
            writer.write_to_file(report, path)?;
            log_written(writer.name(), path);
        }
        None => write_stream(writer, report, &mut io::stdout().lock())?,
    }
    Ok(())
}

/// Write only the report document to `out`.
fn write_stream(
    writer: &dyn ReportWriter,
    report: &Report,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    writer.write(report, out)?;
    out.flush()?;
    Ok(())
}

fn log_written(kind: &str, path: &std::path::Path) {
    log::info!(
        "{} Wrote {} report to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        kind,
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
}

/// Per-kind counts, strictest first, e.g. "exact 2, fuzzy 1".
fn kind_breakdown(report: &Report) -> String {
    MatchKind::all()
        .iter()
        .filter_map(|kind| {
            let n = report.summary.count(*kind);
            (n > 0).then(|| format!("{} {}", kind, n))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Terminal rendering of a report.
pub(crate) fn text_lines(report: &Report) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "{}",
        format!("{} vs PortMaster", report.storefront).if_supports_color(Stdout, |t| t.bold()),
    ));
    lines.push(format!("  Library titles:   {}", report.library_count));
    lines.push(format!("  PortMaster ports: {}", report.catalog_count));
    if report.is_empty() {
        lines.push("  Matches:          0".to_string());
    } else {
        lines.push(format!(
            "  Matches:          {} ({})",
            report.matches.len(),
            kind_breakdown(report)
        ));
    }
    lines.push(String::new());

    if report.is_empty() {
        lines.push(format!(
            "{}",
            "No direct matches found.".if_supports_color(Stdout, |t| t.yellow()),
        ));
        lines.push(format!(
            "Check the full PortMaster games list for potential matches: {}",
            CATALOG_PAGE_URL
        ));
        return lines;
    }

    lines.push(format!(
        "{}",
        "Games you own that have a PortMaster port:".if_supports_color(Stdout, |t| t.bold()),
    ));
    for m in &report.matches {
        let kind = match m.similarity {
            Some(pct) => format!("[{} {}%]", m.kind, pct),
            None => format!("[{}]", m.kind),
        };
        lines.push(format!(
            "  {} {} \u{2192} {} {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            m.library_name,
            m.catalog_name.if_supports_color(Stdout, |t| t.cyan()),
            kind.if_supports_color(Stdout, |t| t.dimmed()),
        ));
        if let Some(hours) = m.playtime_hours {
            lines.push(format!("      Playtime: {} hours", hours));
        }
        lines.push(format!(
            "      {}",
            m.detail_url.if_supports_color(Stdout, |t| t.dimmed())
        ));
    }
    lines
}

#[cfg(test)]
#[path = "../tests/compare_tests.rs"]
mod tests;
