use crate::report::ReportError;
use crate::stats::normality::blom_quantiles;
use crate::stats::{mean, LinReg};

use plotters::element::DashedPathElement;
use plotters::prelude::*;
use statrs::distribution::Normal;
use std::fmt::Display;

pub const PLOT_WIDTH: u32 = 640;
pub const PLOT_HEIGHT: u32 = 400;

/// Inline SVG documents for the report.
#[derive(Clone, Debug, Default)]
pub struct Plots {
    pub fit: String,
    pub residuals: String,
    pub qq: String,
}

fn plot_err<E: Display>(e: E) -> ReportError {
    ReportError::Plot(e.to_string())
}

/// Min and max with a 5% buffer on both sides. A flat range is widened by
/// one unit so the axis stays drawable.
fn padded_range(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().filter(|v| v.is_finite()).fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return (-1.0, 1.0);
    }
    let range = max - min;
    if range <= f64::EPSILON {
        return (min - 1.0, max + 1.0);
    }
    (min - range * 0.05, max + range * 0.05)
}

/// Theoretical quantiles for the Q-Q plot, the same positions the
/// normality test uses.
fn normal_quantiles(n: usize) -> Result<Vec<f64>, ReportError> {
    let normal = Normal::new(0.0, 1.0).map_err(plot_err)?;
    Ok(blom_quantiles(&normal, n))
}

pub fn render_plots(
    x: &[f64],
    y: &[f64],
    line: &LinReg,
    residuals: &[f64],
) -> Result<Plots, ReportError> {
    Ok(Plots {
        fit: fit_plot(x, y, line)?,
        residuals: residual_plot(&residual_points(x, line, residuals))?,
        qq: qq_plot(residuals)?,
    })
}

fn fit_plot(x: &[f64], y: &[f64], line: &LinReg) -> Result<String, ReportError> {
    let (xmin, xmax) = padded_range(x);
    let mut y_all = y.to_vec();
    y_all.extend([line.calculate(xmin), line.calculate(xmax)]);
    let (ymin, ymax) = padded_range(&y_all);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption("Data and fitted line", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(xmin..xmax, ymin..ymax)
            .map_err(plot_err)?;
        ctx.configure_mesh().x_desc("x").y_desc("y").draw().map_err(plot_err)?;

        let col = RGBColor(31, 119, 180);
        ctx.draw_series(
            x.iter().zip(y).map(|(&xi, &yi)| Circle::new((xi, yi), 3, col.mix(0.6).filled())),
        )
        .map_err(plot_err)?;
        ctx.draw_series(LineSeries::new(
            [(xmin, line.calculate(xmin)), (xmax, line.calculate(xmax))],
            RED.stroke_width(2),
        ))
        .map_err(plot_err)?;
        root.present().map_err(plot_err)?;
    }
    Ok(svg)
}

/// `(predicted y, residual)` pairs for the residual plot.
fn residual_points(x: &[f64], line: &LinReg, residuals: &[f64]) -> Vec<(f64, f64)> {
    line.predict(x).into_iter().zip(residuals.iter().copied()).collect()
}

fn residual_plot(points: &[(f64, f64)]) -> Result<String, ReportError> {
    let predicted: Vec<f64> = points.iter().map(|p| p.0).collect();
    let (xmin, xmax) = padded_range(&predicted);
    let mut r_all: Vec<f64> = points.iter().map(|p| p.1).collect();
    r_all.push(0.0);
    let (rmin, rmax) = padded_range(&r_all);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption("Residuals", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(xmin..xmax, rmin..rmax)
            .map_err(plot_err)?;
        ctx.configure_mesh()
            .x_desc("predicted y")
            .y_desc("predicted - actual")
            .draw()
            .map_err(plot_err)?;

        let zero_line = vec![(xmin, 0.0), (xmax, 0.0)];
        ctx.draw_series(std::iter::once(DashedPathElement::new(zero_line, 6, 4, BLACK)))
            .map_err(plot_err)?;
        ctx.draw_series(
            points.iter().map(|&p| Cross::new(p, 3, RGBColor(214, 39, 40).mix(0.8))),
        )
        .map_err(plot_err)?;
        root.present().map_err(plot_err)?;
    }
    Ok(svg)
}

fn qq_plot(residuals: &[f64]) -> Result<String, ReportError> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let q = normal_quantiles(sorted.len())?;

    // reference line through the sample mean with the sample spread
    let r_mean = mean(&sorted);
    let sd = if sorted.len() > 1 {
        (sorted.iter().map(|r| (r - r_mean).powi(2)).sum::<f64>() / (sorted.len() - 1) as f64)
            .sqrt()
    } else {
        0.0
    };

    let (qmin, qmax) = padded_range(&q);
    let mut r_all = sorted.clone();
    r_all.extend([r_mean + sd * qmin, r_mean + sd * qmax]);
    let (rmin, rmax) = padded_range(&r_all);

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption("Normal Q-Q plot of residuals", ("sans-serif", 20))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(50)
            .build_cartesian_2d(qmin..qmax, rmin..rmax)
            .map_err(plot_err)?;
        ctx.configure_mesh()
            .x_desc("theoretical quantile")
            .y_desc("residual")
            .draw()
            .map_err(plot_err)?;

        ctx.draw_series(LineSeries::new(
            [(qmin, r_mean + sd * qmin), (qmax, r_mean + sd * qmax)],
            BLACK.stroke_width(1),
        ))
        .map_err(plot_err)?;
        let col = RGBColor(44, 160, 44);
        ctx.draw_series(
            q.iter().zip(&sorted).map(|(&qi, &ri)| Circle::new((qi, ri), 3, col.mix(0.7).filled())),
        )
        .map_err(plot_err)?;
        root.present().map_err(plot_err)?;
    }
    Ok(svg)
}
