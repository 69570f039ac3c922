use crate::config::ThresholdConfig;
use crate::logic::classifier::categorize;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Bordered single-value gauge: a label line over a fill bar
pub struct GaugeWidget<'a> {
    title: &'a str,
    ratio: Option<f64>,
    label: String,
    color: Color,
}

impl<'a> GaugeWidget<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            ratio: None,
            label: String::new(),
            color: Theme::FG,
        }
    }

    pub fn value(mut self, ratio: f64, label: impl Into<String>) -> Self {
        self.ratio = Some(ratio.clamp(0.0, 1.0));
        self.label = label.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Widget for GaugeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 10 {
            return;
        }

        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let ratio = match self.ratio {
            Some(r) => r,
            None => {
                Paragraph::new(Span::styled("N/A", Theme::dim())).render(inner, buf);
                return;
            }
        };

        let value_line = Line::from(vec![Span::styled(
            self.label,
            Style::default().fg(self.color),
        )]);
        Paragraph::new(value_line).render(inner, buf);

        if inner.height >= 2 {
            let bar_y = inner.y + 1;
            let filled = (inner.width as f64 * ratio) as u16;

            for x in inner.x..inner.x + inner.width {
                let ch = if x < inner.x + filled { '█' } else { '░' };
                buf[(x, bar_y)].set_char(ch).set_fg(self.color);
            }
        }
    }
}

pub fn confidence_gauge(title: &str, confidence: Option<f64>) -> GaugeWidget<'_> {
    match confidence {
        Some(c) => GaugeWidget::new(title)
            .value(c, format!("{:.0}%", c * 100.0))
            .color(Theme::confidence_color(c)),
        None => GaugeWidget::new(title),
    }
}

/// Rainfall against a scale reaching past the late threshold, colored by
/// the category the amount falls in.
pub fn rainfall_gauge<'a>(
    title: &'a str,
    rainfall_mm: Option<f64>,
    thresholds: &ThresholdConfig,
) -> GaugeWidget<'a> {
    match rainfall_mm {
        Some(mm) => {
            let scale = (thresholds.late_mm * 1.5).max(1.0);
            GaugeWidget::new(title)
                .value(mm / scale, format!("{:.2} mm", mm))
                .color(categorize(mm, thresholds).color())
        }
        None => GaugeWidget::new(title),
    }
}
