//! Table and card rendering
//!
//! Rendering records hit areas for mouse clicks and the layout used, so
//! the next input event is interpreted against what is on screen.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::{Body, DataTable, Hit, Record, TableLayout};
use crate::tui::components::scrollbar::{render_scrollbar, ScrollbarStyle};
use crate::tui::layout::Breakpoint;
use crate::tui::traits::RenderContext;

pub(super) const SKELETON: &str = "░░░░░░";
const VIEW_LABEL: &str = "View →";
const VIEW_WIDTH: u16 = 6;

impl<T: Record> DataTable<T> {
    pub fn render(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext, data: &[T], loading: bool) {
        self.sync(data.len(), loading);
        self.hits.clear();
        self.layout = if Breakpoint::from_width(area.width).at_least(Breakpoint::Normal) {
            TableLayout::Desktop
        } else {
            TableLayout::Mobile
        };

        match (self.body(data.len(), loading), self.layout) {
            (Body::Empty, _) => {
                let message = Paragraph::new(self.empty_message.clone())
                    .style(Style::default().fg(ctx.theme.muted));
                f.render_widget(message, area);
            }
            (Body::Skeleton { rows, cells }, TableLayout::Desktop) => {
                self.render_skeleton_rows(f, area, ctx, rows, cells)
            }
            (Body::Skeleton { rows, cells }, TableLayout::Mobile) => {
                self.render_skeleton_cards(f, area, ctx, rows, cells)
            }
            (Body::Rows, TableLayout::Desktop) => self.render_rows(f, area, ctx, data),
            (Body::Rows, TableLayout::Mobile) => self.render_cards(f, area, ctx, data),
        }
    }

    fn widths(&self) -> Vec<Constraint> {
        let mut widths: Vec<Constraint> = self
            .columns
            .iter()
            .map(|c| c.width.map_or(Constraint::Fill(1), Constraint::Length))
            .collect();
        if self.navigate_to.is_some() {
            widths.push(Constraint::Length(VIEW_WIDTH));
        }
        widths
    }

    fn header(&self, ctx: &RenderContext) -> Row<'static> {
        let mut cells: Vec<Cell> = self
            .columns
            .iter()
            .map(|c| Cell::from(c.header.to_line().alignment(c.align.into())))
            .collect();
        if self.navigate_to.is_some() {
            cells.push(Cell::from(""));
        }
        Row::new(cells).style(
            Style::default()
                .fg(ctx.theme.header)
                .add_modifier(Modifier::BOLD),
        )
    }

    fn render_rows(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext, data: &[T]) {
        let viewport = area.height.saturating_sub(1) as usize;
        self.scroll.update_dimensions(data.len(), viewport);
        if let Some(i) = self.focus.current() {
            self.scroll.ensure_visible(i);
        }
        let (start, end) = self.scroll.visible_range();
        let focused = self.focus.current();

        let widths = self.widths();
        let columns = Layout::horizontal(widths.clone()).spacing(1).split(area);
        let view_column = self.navigate_to.as_ref().and(columns.last().copied());

        let mut rows = Vec::with_capacity(end - start);
        for (offset, (index, record)) in data.iter().enumerate().skip(start).take(end - start).enumerate() {
            let y = area.y + 1 + offset as u16;
            let mut cells: Vec<Cell> = self.columns.iter().map(|c| Cell::from(c.cell(record))).collect();

            if let Some(view) = view_column {
                if self.target(record).is_some() {
                    cells.push(Cell::from(Span::styled(VIEW_LABEL, Style::default().fg(ctx.theme.link))));
                    self.hits.push(Hit {
                        area: Rect::new(view.x, y, view.width, 1),
                        index,
                        view: true,
                    });
                } else {
                    cells.push(Cell::from(""));
                }
            }

            let style = if focused == Some(index) {
                Style::default()
                    .bg(ctx.theme.selection)
                    .fg(ctx.theme.selection_fg)
            } else {
                Style::default().fg(ctx.theme.foreground)
            };
            rows.push(Row::new(cells).style(style));
            self.hits.push(Hit {
                area: Rect::new(area.x, y, area.width, 1),
                index,
                view: false,
            });
        }

        let table = Table::new(rows, widths).header(self.header(ctx));
        f.render_widget(table, area);
        render_scrollbar(f, area, &self.scroll, ScrollbarStyle::Minimal);
    }

    fn render_skeleton_rows(&self, f: &mut Frame, area: Rect, ctx: &RenderContext, rows: usize, cells: usize) {
        let style = Style::default().fg(ctx.theme.skeleton);
        let body: Vec<Row> = (0..rows)
            .map(|_| Row::new((0..cells).map(|_| Cell::from(Span::styled(SKELETON, style)))))
            .collect();
        f.render_widget(Table::new(body, self.widths()).header(self.header(ctx)), area);
    }

    /// Height of one card: one line per column, the View line, borders
    fn card_height(&self) -> u16 {
        self.cell_count() as u16 + 2
    }

    fn render_cards(&mut self, f: &mut Frame, area: Rect, ctx: &RenderContext, data: &[T]) {
        let height = self.card_height();
        let per_screen = (area.height / height).max(1) as usize;
        self.scroll.update_dimensions(data.len(), per_screen);
        let (start, end) = self.scroll.visible_range();
        let focused = self.focus.current();

        for (slot, index) in (start..end).enumerate() {
            let record = &data[index];
            let y = area.y + slot as u16 * height;
            if y + height > area.y + area.height {
                break;
            }
            let card_area = Rect::new(area.x, y, area.width, height);

            let mut lines: Vec<Line> = self
                .columns
                .iter()
                .map(|c| {
                    let value = c.cell(record);
                    match c.header.label() {
                        Some(label) => {
                            let mut spans = vec![Span::styled(
                                format!("{}: ", label),
                                Style::default().fg(ctx.theme.muted),
                            )];
                            spans.extend(value.spans);
                            Line::from(spans)
                        }
                        None => value,
                    }
                })
                .collect();
            if self.navigate_to.is_some() {
                match self.target(record) {
                    Some(_) => lines.push(
                        Line::from(Span::styled(VIEW_LABEL, Style::default().fg(ctx.theme.link)))
                            .right_aligned(),
                    ),
                    None => lines.push(Line::default()),
                }
            }

            let border = if focused == Some(index) {
                ctx.theme.highlight
            } else {
                ctx.theme.border
            };
            let card = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(ctx.theme.border_type)
                    .border_style(Style::default().fg(border)),
            );
            f.render_widget(card, card_area);

            let view = self.target(record).is_some();
            self.hits.push(Hit {
                area: card_area,
                index,
                view: false,
            });
            if view {
                self.hits.push(Hit {
                    area: Rect::new(card_area.x + 1, y + height - 2, card_area.width.saturating_sub(2), 1),
                    index,
                    view: true,
                });
            }
        }
    }

    fn render_skeleton_cards(&self, f: &mut Frame, area: Rect, ctx: &RenderContext, cards: usize, cells: usize) {
        let height = cells as u16 + 2;
        let style = Style::default().fg(ctx.theme.skeleton);
        for slot in 0..cards {
            let y = area.y + slot as u16 * height;
            if y + height > area.y + area.height {
                break;
            }
            let lines: Vec<Line> = (0..cells).map(|_| Line::from(Span::styled(SKELETON, style))).collect();
            let card = Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(ctx.theme.border_type)
                    .border_style(Style::default().fg(ctx.theme.border)),
            );
            f.render_widget(card, Rect::new(area.x, y, area.width, height));
        }
    }
}
