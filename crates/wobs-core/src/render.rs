//! Report rendering shared by every sink
//!
//! Field selection and order come from the [`FieldPolicy`]; the
//! [`ReportStyle`] only decides markup. Console, file and message output
//! therefore always report the same facts.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::policy::{FieldPolicy, RenderRule};
use crate::scales::{capitalize, classify, ScaleKind};
use crate::types::{format_float, Envelope, ObservationRecord, ObservationValue, Report};
use crate::units::{
    celsius_to_fahrenheit, celsius_to_kelvin, millibar_to_kilopascal, millibar_to_mmhg, round_to,
};

/// Markup flavour of a rendered report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStyle {
    /// Plain lines for a terminal
    Plain,
    /// Headed markdown section for the report document
    Markdown,
    /// Chat message with hashtags for country and city
    Message,
}

const WATER_TEMPERATURE: &str = "Water temperature";

pub struct ReportRenderer {
    policy: FieldPolicy,
}

impl ReportRenderer {
    pub fn new(policy: FieldPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &FieldPolicy {
        &self.policy
    }

    pub fn render_report(&self, report: &Report, style: ReportStyle) -> String {
        self.render(&report.record, &report.envelope, style)
    }

    /// Render a record and its envelope. Blocks are separated by one blank
    /// line and the text ends with a newline.
    pub fn render(
        &self,
        record: &ObservationRecord,
        envelope: &Envelope,
        style: ReportStyle,
    ) -> String {
        let mut blocks: Vec<Vec<String>> = Vec::new();

        blocks.push(header_lines(envelope, style));

        let mut location = Vec::new();
        if let Some(elevation) = envelope.elevation {
            location.push(format!("Elevation above sea level: {} m", elevation));
        }
        if let Some(kp) = envelope.geomagnetic_index {
            location.push(format_line(
                "Geomagnetic field",
                &ObservationValue::Integer(kp),
                &RenderRule::Scale(ScaleKind::Kp),
            ));
        }
        blocks.push(location);

        let mut current_group = None;
        for (name, value) in record.iter() {
            let (rule, group) = match self.policy.spec_for(name) {
                Some(spec) => (&spec.rule, spec.group),
                None => (&RenderRule::Plain, self.policy.last_group()),
            };
            if current_group != Some(group) {
                blocks.push(Vec::new());
                current_group = Some(group);
            }
            if let Some(block) = blocks.last_mut() {
                block.push(format_line(name, value, rule));
            }
        }

        if let Some(water) = envelope.water_temperature {
            if current_group != Some(self.policy.last_group()) {
                blocks.push(Vec::new());
            }
            if let Some(block) = blocks.last_mut() {
                block.push(format_line(
                    WATER_TEMPERATURE,
                    &ObservationValue::Float(water),
                    &RenderRule::Temperature,
                ));
            }
        }

        let mut out = String::new();
        for block in blocks.iter().filter(|b| !b.is_empty()) {
            if !out.is_empty() {
                out.push('\n');
            }
            for line in block {
                out.push_str(line);
                if style == ReportStyle::Markdown && !line.starts_with('#') {
                    out.push_str("  ");
                }
                out.push('\n');
            }
        }
        out
    }
}

fn header_lines(envelope: &Envelope, style: ReportStyle) -> Vec<String> {
    let city = capitalize(&envelope.city_name);
    let mut lines = Vec::with_capacity(3);
    match style {
        ReportStyle::Plain => {
            lines.push(format!(
                "Country: {} | City name: {}",
                envelope.country_name, city
            ));
            lines.push(format!("Timezone: {}", envelope.timezone));
        }
        ReportStyle::Markdown => {
            lines.push(format!(
                "## Country: {} | City name: {}",
                envelope.country_name, city
            ));
            lines.push(format!("### Timezone: {}", envelope.timezone));
        }
        ReportStyle::Message => {
            lines.push(format!(
                "Country: {} | City name: {}",
                hashtag(&envelope.country_name),
                hashtag(&city)
            ));
            lines.push(format!("Timezone: {}", envelope.timezone));
        }
    }
    if let Some(time) = &envelope.local_time {
        lines.push(format!("Time: {}", time));
    }
    lines
}

fn hashtag(s: &str) -> String {
    let tag: String = s
        .chars()
        .map(|c| if c.is_whitespace() || c == '-' { '_' } else { c })
        .collect();
    format!("#{}", tag)
}

/// Render one `label: value` line according to its rule.
///
/// A value the rule cannot interpret (text in a numeric field, a reading
/// below its scale) is shown as-is so the line stays complete.
pub fn format_line(label: &str, value: &ObservationValue, rule: &RenderRule) -> String {
    let number = value.as_f64();
    match (rule, number) {
        (RenderRule::Percentage, _) => format!("{}: {}%", label, value),
        (RenderRule::Unit(unit), _) => format!("{}: {} {}", label, value, unit),
        (RenderRule::Pressure, Some(mb)) => format!(
            "{}: {} mb | {} mmHg | {} kPa",
            label,
            format_float(round_to(mb, 2)),
            format_float(round_to(millibar_to_mmhg(mb), 2)),
            format_float(round_to(millibar_to_kilopascal(mb), 2)),
        ),
        (RenderRule::Temperature, Some(c)) => format!(
            "{}: {} C | {} F | {} K",
            label,
            value,
            format_float(round_to(celsius_to_fahrenheit(c), 1)),
            format_float(round_to(celsius_to_kelvin(c), 2)),
        ),
        (RenderRule::Scale(kind), Some(v)) => match classify(*kind, v) {
            Ok(category) => format!("{}: {} - {}", label, value, capitalize(category)),
            Err(e) => {
                warn!(field = label, error = %e, "value outside its scale, rendering without category");
                format!("{}: {}", label, value)
            }
        },
        _ => format!("{}: {}", label, value),
    }
}
