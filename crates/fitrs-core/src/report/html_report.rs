use crate::model::Model;
use crate::report::plot::{render_plots, Plots};
use crate::report::ReportError;
use crate::stats::LinReg;

use chrono::NaiveDate;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Everything the QA report shows. `x` and `y` are the data the model was
/// fitted on.
pub struct ReportData<'a> {
    pub model: &'a Model,
    pub x: &'a [f64],
    pub y: &'a [f64],
    /// Human readable origin of the data, e.g. a file path.
    pub source: &'a str,
    pub date: NaiveDate,
}

/// `YYYY-MM-DD_regression_QA.html`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("{}_regression_QA.html", date.format("%Y-%m-%d"))
}

/// Replaces typographic single and double quotes with their ASCII forms.
pub fn normalize_quotes(html: &str) -> String {
    html.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201c}' | '\u{201d}' => '"',
            other => other,
        })
        .collect()
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

fn row(html: &mut String, name: &str, value: &str) {
    html.push_str(&format!("      <tr><th>{}</th><td>{}</td></tr>\n", name, value));
}

pub fn render_html(data: &ReportData, plots: &Plots) -> Result<String, ReportError> {
    let model = data.model;
    let summary = model.summary().ok_or(ReportError::NotFitted)?;
    let hyper = model.hyperparameters();

    let mut html = String::from(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Regression QA "#,
    );
    html.push_str(&data.date.to_string());
    html.push_str(
        r#"</title>
  <style>
    body { font-family: Arial, sans-serif; padding: 20px; }
    table { border-collapse: collapse; margin-bottom: 20px; }
    th, td { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
    th { background-color: #f2f2f2; }
    .plots svg { margin: 10px 10px 0 0; }
    .warn { color: #b35900; }
  </style>
</head>
<body>
  <h1>Regression QA "#,
    );
    html.push_str(&data.date.to_string());
    html.push_str("</h1>\n");
    html.push_str(&format!(
        "  <p>Data: {} ({} points)</p>\n",
        escape(data.source),
        summary.residuals.len()
    ));

    html.push_str("  <h2>Fitted model</h2>\n  <table>\n");
    let equation = format!("y = {:.6} &middot; x + {:.6}", model.theta_1(), model.theta_0());
    row(&mut html, "Equation", &equation);
    row(&mut html, "&theta;<sub>0</sub> (intercept)", &format!("{:.6}", model.theta_0()));
    row(&mut html, "&theta;<sub>1</sub> (slope)", &format!("{:.6}", model.theta_1()));
    row(&mut html, "R<sup>2</sup>", &format!("{:.6}", summary.r_squared));
    row(&mut html, "Shapiro-Wilk W", &format!("{:.6}", summary.w_stat()));
    row(&mut html, "Shapiro-Wilk p-value", &format!("{:.6}", summary.p_value()));
    row(&mut html, "Iterations", &summary.iterations.to_string());
    row(&mut html, "Initial loss", &format!("{:.6e}", summary.initial_loss));
    row(&mut html, "Final loss", &format!("{:.6e}", summary.final_loss));
    row(&mut html, "Fit runtime (s)", &format!("{:.6}", summary.fit_duration.as_secs_f64()));
    html.push_str("  </table>\n");

    if let Some(ols) = LinReg::least_squares(data.x, data.y) {
        html.push_str("  <h2>Closed-form check</h2>\n  <table>\n");
        row(&mut html, "Least squares &theta;<sub>0</sub>", &format!("{:.6}", ols.intercept));
        row(&mut html, "Least squares &theta;<sub>1</sub>", &format!("{:.6}", ols.slope));
        row(
            &mut html,
            "Largest parameter gap",
            &format!(
                "{:.3e}",
                (ols.intercept - model.theta_0()).abs().max((ols.slope - model.theta_1()).abs())
            ),
        );
        html.push_str("  </table>\n");
    }

    if summary.p_value() < 0.05 {
        html.push_str(
            "  <p class=\"warn\">Residuals deviate from normality at the 5% level.</p>\n",
        );
    }

    html.push_str("  <h2>Configuration</h2>\n  <table>\n");
    row(&mut html, "Learning rate", &hyper.learning_rate.to_string());
    row(&mut html, "Convergence threshold", &hyper.convergence_threshold.to_string());
    row(
        &mut html,
        "Max iterations",
        &hyper.max_iterations.map_or_else(|| "unbounded".to_owned(), |m| m.to_string()),
    );
    html.push_str("  </table>\n");

    html.push_str("  <h2>Plots</h2>\n  <div class=\"plots\">\n");
    for svg in [&plots.fit, &plots.residuals, &plots.qq] {
        html.push_str(svg);
        html.push('\n');
    }
    html.push_str(
        r#"  </div>
</body>
</html>
"#,
    );

    Ok(html)
}

/// Writes `html` as the report for `date` into `dir`, replacing an existing
/// report of the same day.
pub fn write_html(dir: &Path, date: NaiveDate, html: &str) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(dir)?;
    let filename = dir.join(report_file_name(date));
    if filename.exists() {
        fs::remove_file(&filename)?;
    }

    let mut file = File::create(&filename)?;
    file.write_all(normalize_quotes(html).as_bytes())?;
    file.flush()?;

    info!(path = %filename.display(), "report written");
    Ok(filename)
}

/// Renders plots and HTML for a fitted model and writes the report file.
pub fn write_report(dir: &Path, data: &ReportData) -> Result<PathBuf, ReportError> {
    let model = data.model;
    let residuals = model.residuals_fitted().ok_or(ReportError::NotFitted)?;
    let plots = render_plots(data.x, data.y, &model.line(), residuals)?;
    let html = render_html(data, &plots)?;
    write_html(dir, data.date, &html)
}
