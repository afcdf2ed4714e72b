//! Figure construction.
//!
//! Turns an [`Analysis`] into a plotly-compatible figure description: two
//! line traces over elapsed minutes, a shaded background and dotted start
//! line per cycle with a centered label, and relayout dropdowns for zoom
//! reset, y-axis tick interval and cycle-annotation stride. Missing readings
//! serialize as `null` so the renderer gaps the trace instead of drawing a
//! sentinel. Pure presentation; all detection lives in the analysis module.

use crate::analysis::{Analysis, cycle_span};
use crate::config::ChartParams;
use serde_json::{Value, json};

/// Build the figure description for one analyzed series.
pub fn build_figure(analysis: &Analysis, params: &ChartParams) -> Value {
    let elapsed: Vec<f64> = analysis
        .samples
        .iter()
        .map(|sample| sample.elapsed_min)
        .collect();
    let pv: Vec<Option<f64>> = analysis.samples.iter().map(|sample| sample.pv).collect();
    let sp: Vec<Option<f64>> = analysis.samples.iter().map(|sample| sample.sp).collect();

    let default_step = params.cycle_steps.first().copied().unwrap_or(1);
    let (shapes, cycle_annotations) = cycle_layers(analysis, params, default_step);
    let mut annotations = header_annotations();
    annotations.extend(cycle_annotations);

    json!({
        "data": [
            {
                "type": "scatter",
                "mode": "lines",
                "name": "PV",
                "x": elapsed,
                "y": pv,
                "line": { "color": "firebrick", "width": 1.5 },
            },
            {
                "type": "scatter",
                "mode": "lines",
                "name": "SP",
                "x": elapsed,
                "y": sp,
                "line": { "color": "royalblue", "width": 1.0, "dash": "dash" },
            },
        ],
        "layout": {
            "xaxis": {
                "title": { "text": "Elapsed [min]" },
                "rangeslider": { "visible": true },
            },
            "yaxis": {
                "range": [params.y_min, params.y_max],
                "dtick": params.y_ticks.first(),
            },
            "shapes": shapes,
            "annotations": annotations,
            "updatemenus": update_menus(analysis, params),
        },
    })
}

/// Labels for the three dropdown groups, anchored to the paper frame above
/// the plot.
fn header_annotations() -> Vec<Value> {
    [
        (0.0, "<b>1. Zoom</b>"),
        (0.35, "<b>2. Y ticks</b>"),
        (0.7, "<b>3. Cycle stride</b>"),
    ]
    .iter()
    .map(|&(x, text)| {
        json!({
            "x": x,
            "y": 1.12,
            "xref": "paper",
            "yref": "paper",
            "text": text,
            "showarrow": false,
            "xanchor": "left",
        })
    })
    .collect()
}

/// Background rectangle, dotted start line and label for every `step`-th
/// cycle.
fn cycle_layers(analysis: &Analysis, params: &ChartParams, step: usize) -> (Vec<Value>, Vec<Value>) {
    let mut shapes = Vec::new();
    let mut annotations = Vec::new();

    let Some(last_elapsed) = analysis.last_elapsed() else {
        return (shapes, annotations);
    };
    let label_y = params.y_max - (params.y_max - params.y_min) * 0.1;

    for index in (0..analysis.boundaries.len()).step_by(step.max(1)) {
        let Some((start, end)) = cycle_span(&analysis.boundaries, last_elapsed, index) else {
            break;
        };

        shapes.push(json!({
            "type": "rect",
            "x0": start,
            "x1": end,
            "y0": 0,
            "y1": 1,
            "xref": "x",
            "yref": "paper",
            "fillcolor": "rgba(180, 180, 180, 0.25)",
            "line_width": 0,
            "layer": "below",
        }));
        shapes.push(json!({
            "type": "line",
            "x0": start,
            "x1": start,
            "y0": 0,
            "y1": 1,
            "xref": "x",
            "yref": "paper",
            "line": { "color": "rgba(100, 100, 100, 0.4)", "width": 1, "dash": "dot" },
        }));
        annotations.push(json!({
            "x": start + (end - start) / 2.0,
            "y": label_y,
            "text": format!("<b>Cycle {}</b>", index + 1),
            "showarrow": false,
            "font": { "size": 14, "color": "blue" },
            "bgcolor": "rgba(255, 255, 255, 0.6)",
        }));
    }

    (shapes, annotations)
}

fn update_menus(analysis: &Analysis, params: &ChartParams) -> Vec<Value> {
    let zoom_buttons = vec![json!({
        "method": "relayout",
        "label": "Reset zoom",
        "args": [{ "xaxis.autorange": true }],
    })];

    let tick_buttons: Vec<Value> = params
        .y_ticks
        .iter()
        .map(|tick| {
            json!({
                "method": "relayout",
                "label": format!("{tick}"),
                "args": [{ "yaxis.dtick": tick }],
            })
        })
        .collect();

    let step_buttons: Vec<Value> = params
        .cycle_steps
        .iter()
        .map(|&step| {
            // Relayout replaces the annotation list wholesale, so each
            // button carries the headers along with its cycle labels.
            let (shapes, cycle_annotations) = cycle_layers(analysis, params, step);
            let mut annotations = header_annotations();
            annotations.extend(cycle_annotations);
            json!({
                "method": "relayout",
                "label": format!("every {step}"),
                "args": [{ "shapes": shapes, "annotations": annotations }],
            })
        })
        .collect();

    vec![
        json!({ "x": 0.0, "y": 1.15, "xanchor": "left", "buttons": zoom_buttons }),
        json!({ "x": 0.35, "y": 1.15, "xanchor": "left", "buttons": tick_buttons }),
        json!({ "x": 0.7, "y": 1.15, "xanchor": "left", "buttons": step_buttons }),
    ]
}
