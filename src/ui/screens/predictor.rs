use crate::app::App;
use crate::report;
use crate::ui::components::{confidence_gauge, rainfall_gauge};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

pub struct PredictorScreen<'a> {
    pub app: &'a App,
}

impl<'a> PredictorScreen<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for PredictorScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);

        let content = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(chunks[1]);

        let sidebar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(6)])
            .split(content[0]);

        self.render_year_selector(sidebar[0], buf);
        self.render_about(sidebar[1], buf);
        self.render_prediction(content[1], buf);

        self.render_status_message(chunks[2], buf);
        self.render_nav(chunks[3], buf);
    }
}

impl PredictorScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let config = &self.app.config;
        let lines = vec![
            Line::from(Span::styled(report::title(config), Theme::title())),
            Line::from(Span::styled(report::intro(config), Theme::dim())),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_year_selector(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Select Year for Prediction")
            .borders(Borders::ALL)
            .border_style(Theme::border_focused());

        let inner = block.inner(area);
        block.render(area, buf);

        let mut spans = Vec::new();
        for (i, year) in self.app.years.iter().enumerate() {
            let style = if i == self.app.selected_index {
                Theme::selected()
            } else {
                Theme::normal()
            };
            spans.push(Span::styled(format!(" {} ", year), style));
        }

        let lines = vec![
            Line::from(spans),
            Line::from(Span::styled(
                format!("Predict {} Planting Window: [Enter]", self.app.config.crop.name),
                Theme::dim(),
            )),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }

    fn render_about(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("About This Tool")
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = report::rule_lines(&self.app.config)
            .into_iter()
            .map(|l| Line::from(Span::styled(l, Theme::normal())))
            .collect();

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }

    fn render_prediction(&self, area: Rect, buf: &mut Buffer) {
        let title = format!(
            "Prediction for {} Planting in {}",
            self.app.config.crop.name,
            self.app.selected_year()
        );
        let border = match self.app.prediction {
            Some(ref r) if r.has_data_warning() => Theme::warning(),
            _ => Theme::border(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border);

        let inner = block.inner(area);
        block.render(area, buf);

        if let Some(ref err) = self.app.error_message {
            Paragraph::new(Span::styled(err.as_str(), Theme::error()))
                .wrap(Wrap { trim: true })
                .render(inner, buf);
            return;
        }

        let result = match self.app.prediction {
            Some(ref r) => r,
            None => {
                let hint = if self.app.predicting {
                    "Fetching rainfall data..."
                } else {
                    "Press Enter to predict the planting window for the selected year"
                };
                Paragraph::new(Span::styled(hint, Theme::dim())).render(inner, buf);
                return;
            }
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Category and dates
                Constraint::Length(4), // Gauges
                Constraint::Min(4),    // Factors and data period
            ])
            .split(inner);

        let headline = vec![
            Line::from(vec![
                Span::styled("Predicted Window Category: ", Theme::dim()),
                Span::styled(
                    result.category.as_str(),
                    Style::default().fg(result.category.color()),
                ),
            ]),
            Line::from(vec![
                Span::styled("Suggested Planting Dates: ", Theme::dim()),
                Span::styled(result.suggested_dates.as_str(), Theme::highlight()),
            ]),
        ];
        Paragraph::new(headline).render(rows[0], buf);

        let gauges = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        confidence_gauge("Confidence", Some(result.confidence)).render(gauges[0], buf);
        rainfall_gauge(
            "Rabi Harvest Rainfall",
            Some(result.rainfall_mm),
            &self.app.config.thresholds,
        )
        .render(gauges[1], buf);

        let mut lines = vec![Line::from(Span::styled(
            "Key Factors Considered:",
            Theme::dim(),
        ))];
        for factor in &result.key_factors {
            let style = if result.is_warning_factor(factor) {
                Theme::warning()
            } else {
                Theme::normal()
            };
            lines.push(Line::from(Span::styled(format!("- {}", factor), style)));
        }
        lines.push(Line::from(vec![]));
        lines.push(Line::from(vec![
            Span::styled("Data Period Analysed: ", Theme::dim()),
            Span::styled(
                format!("{} (Rabi harvest)", result.reference_period),
                Theme::normal(),
            ),
        ]));
        lines.push(Line::from(vec![
            Span::styled("Total Rainfall in this Period: ", Theme::dim()),
            Span::styled(format!("{:.2} mm", result.rainfall_mm), Theme::normal()),
        ]));
        lines.push(Line::from(vec![]));
        lines.push(Line::from(Span::styled(
            report::reminder(&result.crop),
            Theme::success(),
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(rows[2], buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(ref msg) = self.app.status_message {
            Paragraph::new(Span::styled(msg.as_str(), Theme::highlight())).render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[←→]", Theme::nav_key()),
            Span::styled("Year ", Theme::nav_label()),
            Span::styled("[Enter]", Theme::nav_key()),
            Span::styled("Predict ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(area, buf);
    }
}
