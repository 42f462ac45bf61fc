use std::io::Write;

use portmatch_match::MatchKind;

use crate::{CATALOG_PAGE_URL, Report, ReportError, ReportMatch, ReportWriter};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; max-width: 1000px; margin: 20px auto; padding: 20px; }
.header { background: #4CAF50; color: white; padding: 20px; border-radius: 10px; text-align: center; }
.stats { display: flex; justify-content: space-around; margin: 20px 0; }
.stat { background: #f5f5f5; padding: 20px; border-radius: 10px; text-align: center; }
.stat .number { font-size: 2em; font-weight: bold; color: #4CAF50; }
.match { display: flex; gap: 15px; background: white; margin: 10px 0; padding: 15px; border-radius: 5px; border-left: 4px solid #4CAF50; }
.match img { width: 160px; height: 120px; object-fit: cover; border-radius: 5px; }
.match h4 { margin: 0 0 10px 0; }
.meta { color: #666; font-size: 0.9em; }
.kind { color: #888; font-size: 0.8em; }
.empty { background: #fff3cd; padding: 20px; border-radius: 10px; margin-top: 20px; }
";

/// Self-contained HTML page.
pub struct HtmlWriter;

impl HtmlWriter {
    pub fn new() -> Self {
        Self
    }

    /// Render the page to a string.
    pub fn render(&self, report: &Report) -> String {
        let storefront = report.storefront.display_name();
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
        html.push_str(&format!(
            "<title>{} vs PortMaster Report</title>\n",
            escape_html(storefront)
        ));
        html.push_str("<style>\n");
        html.push_str(STYLE);
        html.push_str("</style>\n</head>\n<body>\n");

        html.push_str(&format!(
            "<div class=\"header\"><h1>{} vs PortMaster</h1></div>\n",
            escape_html(storefront)
        ));

        html.push_str("<div class=\"stats\">\n");
        write_stat(&mut html, report.library_count, &format!("{} Games", storefront));
        write_stat(&mut html, report.catalog_count, "PortMaster Ports");
        write_stat(&mut html, report.matches.len(), "Matches Found");
        html.push_str("</div>\n");

        if report.is_empty() {
            write_no_matches(&mut html, storefront);
        } else {
            html.push_str("<div class=\"matches\">\n");
            html.push_str("<h2>Games you own that have a PortMaster port</h2>\n");
            for m in &report.matches {
                write_match(&mut html, m);
            }
            html.push_str("</div>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportWriter for HtmlWriter {
    fn name(&self) -> &'static str {
        "HTML"
    }

    fn extension(&self) -> &'static str {
        "html"
    }

    fn write(&self, report: &Report, out: &mut dyn Write) -> Result<(), ReportError> {
        out.write_all(self.render(report).as_bytes())?;
        Ok(())
    }
}

fn write_stat(html: &mut String, number: usize, label: &str) {
    html.push_str(&format!(
        "  <div class=\"stat\"><div class=\"number\">{}</div><h3>{}</h3></div>\n",
        number,
        escape_html(label)
    ));
}

fn write_match(html: &mut String, m: &ReportMatch) {
    html.push_str("  <div class=\"match\">\n");
    html.push_str(&format!(
        "    <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n",
        escape_html(&m.image_url),
        escape_html(&m.catalog_name)
    ));
    html.push_str("    <div>\n");
    html.push_str(&format!("      <h4>{}</h4>\n", escape_html(&m.library_name)));
    html.push_str(&format!(
        "      <div>PortMaster port: <a href=\"{}\"><strong>{}</strong></a></div>\n",
        escape_html(&m.detail_url),
        escape_html(&m.catalog_name)
    ));
    if let Some(hours) = m.playtime_hours {
        html.push_str(&format!("      <div class=\"meta\">Playtime: {} hours</div>\n", hours));
    }
    if let Some(ref desc) = m.description {
        html.push_str(&format!("      <p class=\"meta\">{}</p>\n", escape_html(desc)));
    }
    html.push_str(&format!(
        "      <div class=\"kind\">Match type: {}</div>\n",
        kind_label(m.kind, m.similarity)
    ));
    html.push_str("    </div>\n  </div>\n");
}

fn kind_label(kind: MatchKind, similarity: Option<u8>) -> String {
    match similarity {
        Some(pct) => format!("{} ({}% similarity)", kind, pct),
        None => kind.to_string(),
    }
}

fn write_no_matches(html: &mut String, storefront: &str) {
    html.push_str("<div class=\"empty\">\n<h2>No Direct Matches Found</h2>\n");
    html.push_str(&format!(
        "<p>No titles in your {} library matched a PortMaster port. This could be because:</p>\n",
        escape_html(storefront)
    ));
    html.push_str("<ul>\n");
    html.push_str("  <li>Game names differ too much between the storefront and PortMaster</li>\n");
    html.push_str("  <li>Some ports need game files from a specific storefront release</li>\n");
    html.push_str("  <li>New ports may have been added since the catalog was cached</li>\n");
    html.push_str("</ul>\n");
    html.push_str(&format!(
        "<p>Check the <a href=\"{}\">full PortMaster games list</a> for potential matches.</p>\n",
        CATALOG_PAGE_URL
    ));
    html.push_str("</div>\n");
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
