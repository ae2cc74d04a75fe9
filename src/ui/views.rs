use chrono::{Local, NaiveDate};
use egui::{Color32, Ui};

use crate::config::{ClockFormat, TimeFormat};
use crate::schedule::{
    has_overlap, Block, Interval, Shift, ShiftKind, ScheduleState, TimeOfDay, ViewBlock, Weekday,
    MINUTES_PER_DAY,
};
use super::theme::{
    bold_family, draft_color, phosphor_fill_family, preview_color, shift_color, vacation_colors,
};

/// Result from week grid interactions
#[derive(Default)]
pub struct ScheduleResult {
    pub clicked_shift: Option<Shift>,
    pub clicked_vacation: Option<NaiveDate>,
    pub add_at: Option<(Weekday, TimeOfDay)>,  // double-click on empty space
}

pub fn format_minutes(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    if hours > 0 && mins > 0 {
        format!("{}h {}m", hours, mins)
    } else if hours > 0 {
        format!("{}h", hours)
    } else if mins > 0 {
        format!("{}m", mins)
    } else {
        "0m".to_string()
    }
}

/// Format minutes based on user's preferred duration format
pub fn format_minutes_with_format(minutes: u32, time_format: TimeFormat) -> String {
    match time_format {
        TimeFormat::HoursMinutes => format_minutes(minutes),
        TimeFormat::Decimal => {
            let hours = minutes as f32 / 60.0;
            if minutes == 0 {
                "0h".to_string()
            } else if minutes % 60 == 0 {
                format!("{}h", minutes / 60)
            } else {
                // Format with 2 decimals, then trim trailing zeros
                let s = format!("{:.2}", hours);
                let trimmed = s.trim_end_matches('0').trim_end_matches('.');
                format!("{}h", trimmed)
            }
        }
    }
}

pub fn format_clock_time(time: TimeOfDay, clock_format: ClockFormat) -> String {
    match clock_format {
        ClockFormat::Hour24 => time.to_string(),
        ClockFormat::Hour12 => time.format_12h(),
    }
}

pub fn format_span(start: TimeOfDay, end: TimeOfDay, clock_format: ClockFormat) -> String {
    format!(
        "{} - {}",
        format_clock_time(start, clock_format),
        format_clock_time(end, clock_format)
    )
}

/// Hours the grid must show: the configured range, widened to fit every block.
fn visible_range(state: &ScheduleState, blocks: &[ViewBlock], hours: (u8, u8)) -> (u32, u32) {
    let (mut start_hour, mut end_hour) = (hours.0 as u32, hours.1 as u32);
    for view in blocks {
        start_hour = start_hour.min(view.block.start_min / 60);
        let end = view.block.end_min.min(MINUTES_PER_DAY);
        end_hour = end_hour.max(end.div_ceil(60));
        if view.block.end_min > MINUTES_PER_DAY {
            // The tail is drawn on the next column from midnight.
            start_hour = 0;
        }
    }
    if let Some(preview) = state.preview() {
        for segment in &preview.segments {
            start_hour = start_hour.min(segment.block.start_min / 60);
            end_hour = end_hour.max(segment.block.end_min.min(MINUTES_PER_DAY).div_ceil(60));
        }
    }
    (start_hour, end_hour.clamp(start_hour + 1, 24))
}

/// Splits a block into the part on its own day and the part that spills past
/// midnight into the next column.
fn day_parts(block: &Block) -> Vec<(usize, u32, u32)> {
    let day = block.day.index();
    let mut parts = vec![(day, block.start_min, block.end_min.min(MINUTES_PER_DAY))];
    if block.end_min > MINUTES_PER_DAY && day + 1 < 7 {
        parts.push((day + 1, 0, block.end_min - MINUTES_PER_DAY));
    }
    parts
}

pub fn render_schedule_view(
    ui: &mut Ui,
    state: &ScheduleState,
    time_format: TimeFormat,
    clock_format: ClockFormat,
    hours: (u8, u8),
) -> ScheduleResult {
    let mut result = ScheduleResult::default();
    let today = Local::now().date_naive();
    let week = state.week();
    let dates = week.dates();
    let blocks = state.view();
    let vacations = state.vacation_days();

    let (schedule_start_hour, schedule_end_hour) = visible_range(state, &blocks, hours);

    // Layout constants
    let hour_label_width = 60.0;
    let header_height = 40.0;
    let hour_height = 48.0;
    let grid_line_color = Color32::from_rgb(0x40, 0x40, 0x3c);
    let hour_line_color = Color32::from_rgb(0x50, 0x50, 0x4a);

    let num_hours = (schedule_end_hour - schedule_start_hour) as usize;
    let total_grid_height = num_hours as f32 * hour_height;

    let available_width = ui.available_width();
    let day_width = (available_width - hour_label_width) / 7.0;

    // Fixed day headers (outside ScrollArea)
    let (header_rect, _) = ui.allocate_exact_size(
        egui::vec2(available_width, header_height),
        egui::Sense::hover()
    );
    let painter = ui.painter();

    for (i, day) in Weekday::ALL.iter().enumerate() {
        let date = dates[i];
        let x = header_rect.min.x + hour_label_width + i as f32 * day_width;
        let col_header_rect = egui::Rect::from_min_size(
            egui::pos2(x, header_rect.min.y),
            egui::vec2(day_width, header_height)
        );

        let day_color = if date == today {
            super::theme::accent()
        } else {
            Color32::from_rgb(0xb0, 0xb0, 0xa8)
        };
        let text_left = col_header_rect.min.x + 8.0;

        painter.text(
            egui::pos2(text_left, col_header_rect.min.y + 4.0),
            egui::Align2::LEFT_TOP,
            format!("{} {}", day.symbol(), date.format("%-d")),
            egui::FontId::proportional(14.0),
            day_color,
        );

        let minutes = state.day_minutes(*day);
        if minutes > 0 {
            painter.text(
                egui::pos2(text_left, col_header_rect.max.y - 4.0),
                egui::Align2::LEFT_BOTTOM,
                format_minutes_with_format(minutes, time_format),
                egui::FontId::new(13.0, bold_family()),
                Color32::WHITE,
            );
        }

        if i > 0 {
            painter.line_segment(
                [
                    egui::pos2(x, col_header_rect.min.y + 4.0),
                    egui::pos2(x, col_header_rect.max.y - 4.0),
                ],
                egui::Stroke::new(1.0, grid_line_color),
            );
        }
    }

    egui::ScrollArea::vertical().show(ui, |ui| {
        let (grid_rect, _) = ui.allocate_exact_size(
            egui::vec2(available_width, total_grid_height),
            egui::Sense::hover()
        );

        let pixels_per_minute = hour_height / 60.0;
        let start_minutes = schedule_start_hour * 60;
        let end_minutes = schedule_end_hour * 60;
        let col_x = |idx: usize| grid_rect.min.x + hour_label_width + idx as f32 * day_width;
        let y_of = |minute: u32| {
            grid_rect.min.y + (minute.clamp(start_minutes, end_minutes) - start_minutes) as f32 * pixels_per_minute
        };
        let minute_at = |y: f32| start_minutes + ((y - grid_rect.min.y).max(0.0) / pixels_per_minute) as u32;

        let painter = ui.painter();

        // Highlight current day column with dim background
        if let Some(idx) = dates.iter().position(|d| *d == today) {
            let col_rect = egui::Rect::from_min_size(
                egui::pos2(col_x(idx), grid_rect.min.y),
                egui::vec2(day_width, total_grid_height)
            );
            painter.rect_filled(col_rect, 0.0, Color32::from_rgb(0x11, 0x11, 0x10));
        }

        // Vertical grid lines for columns
        for i in 0..=7 {
            let x = if i == 7 { grid_rect.max.x } else { col_x(i) };
            painter.line_segment(
                [egui::pos2(x, grid_rect.min.y), egui::pos2(x, grid_rect.max.y)],
                egui::Stroke::new(1.0, grid_line_color),
            );
        }

        // Hour labels and horizontal grid lines
        for hour_idx in 0..=num_hours {
            let hour = schedule_start_hour + hour_idx as u32;
            let y = grid_rect.min.y + hour_idx as f32 * hour_height;

            if hour_idx < num_hours {
                painter.text(
                    egui::pos2(grid_rect.min.x + hour_label_width - 8.0, y),
                    egui::Align2::RIGHT_TOP,
                    format_clock_time(TimeOfDay::from_minutes(hour * 60), clock_format),
                    egui::FontId::proportional(11.0),
                    Color32::from_rgb(0x70, 0x70, 0x68),
                );
            }

            painter.line_segment(
                [
                    egui::pos2(grid_rect.min.x + hour_label_width, y),
                    egui::pos2(grid_rect.max.x, y),
                ],
                egui::Stroke::new(1.0, if hour_idx == 0 { hour_line_color } else { grid_line_color }),
            );

            // 15-minute subdivision lines
            if hour_idx < num_hours {
                let quarter_color = Color32::from_rgb(0x24, 0x24, 0x22);
                let quarter_height = hour_height / 4.0;
                for quarter in 1..4 {
                    let quarter_y = y + quarter as f32 * quarter_height;
                    painter.line_segment(
                        [
                            egui::pos2(grid_rect.min.x + hour_label_width, quarter_y),
                            egui::pos2(grid_rect.max.x, quarter_y),
                        ],
                        egui::Stroke::new(1.0, quarter_color),
                    );
                }
            }
        }

        // Vacation columns
        let (vacation_fill, vacation_text) = vacation_colors();
        for vacation in &vacations {
            let Some(idx) = dates.iter().position(|d| *d == vacation.date) else {
                continue;
            };
            let rect = egui::Rect::from_min_size(
                egui::pos2(col_x(idx) + 2.0, grid_rect.min.y),
                egui::vec2(day_width - 4.0, total_grid_height)
            );
            painter.rect_filled(rect, 4.0, vacation_fill);
            let label = if vacation.source == crate::schedule::Source::Draft {
                format!("{} Vacation (unsaved)", egui_phosphor::fill::AIRPLANE_TILT)
            } else {
                format!("{} Vacation", egui_phosphor::fill::AIRPLANE_TILT)
            };
            painter.text(
                egui::pos2(rect.center().x, rect.min.y + 16.0),
                egui::Align2::CENTER_CENTER,
                label,
                egui::FontId::new(13.0, phosphor_fill_family()),
                vacation_text,
            );
        }

        // Merged blocks
        let mut block_rects: Vec<(usize, egui::Rect)> = Vec::new();
        for view in &blocks {
            for (idx, from, to) in day_parts(&view.block) {
                if to <= start_minutes || from >= end_minutes {
                    continue;
                }
                let rect = egui::Rect::from_min_max(
                    egui::pos2(col_x(idx) + 2.0, y_of(from)),
                    egui::pos2(col_x(idx) + day_width - 2.0, (y_of(to) - 2.0).max(y_of(from) + 16.0)),
                );
                block_rects.push((idx, rect));
                paint_block(ui, rect, view, time_format, clock_format);
            }
        }

        // Live edit preview
        if let Some(preview) = state.preview() {
            if let Some(kept) = &preview.kept {
                for (idx, from, to) in day_parts(kept) {
                    let rect = egui::Rect::from_min_max(
                        egui::pos2(col_x(idx) + 2.0, y_of(from)),
                        egui::pos2(col_x(idx) + day_width - 2.0, y_of(to)),
                    );
                    ui.painter().rect(rect, 4.0, Color32::from_rgb(0x1c, 0x1c, 0x1a), egui::Stroke::new(1.0, Color32::WHITE));
                }
            }
            for segment in &preview.segments {
                for (idx, from, to) in day_parts(&segment.block) {
                    let rect = egui::Rect::from_min_max(
                        egui::pos2(col_x(idx) + 2.0, y_of(from)),
                        egui::pos2(col_x(idx) + day_width - 2.0, y_of(to)),
                    );
                    ui.painter().rect_filled(rect, 4.0, preview_color(segment.kind));
                }
            }
        }

        // Interaction per column
        let pointer_pos = ui.ctx().pointer_hover_pos();
        for (idx, day) in Weekday::ALL.iter().enumerate() {
            let date = dates[idx];
            let col_rect = egui::Rect::from_min_size(
                egui::pos2(col_x(idx), grid_rect.min.y),
                egui::vec2(day_width, total_grid_height)
            );
            let col_response = ui.interact(col_rect, ui.id().with(("day_col", idx)), egui::Sense::click());

            let on_vacation = vacations.iter().any(|v| v.date == date);
            let over_block = pointer_pos
                .map(|pos| block_rects.iter().any(|(i, r)| *i == idx && r.contains(pos)))
                .unwrap_or(false);

            if col_response.hovered() && (over_block || on_vacation) {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }

            // Ghost preview of a one-hour quick add
            if col_response.hovered() && !over_block && !on_vacation {
                if let Some(pos) = pointer_pos {
                    let snapped = (minute_at(pos.y) / 15) * 15;
                    let start = TimeOfDay::from_minutes(snapped);
                    let end = TimeOfDay::from_minutes(snapped + 60);
                    let ghost = Interval::new(*day, start, end);
                    if snapped + 60 <= end_minutes && !has_overlap(&ghost, &state.overlap_pool(None)) {
                        let ghost_rect = egui::Rect::from_min_max(
                            egui::pos2(col_x(idx) + 2.0, y_of(snapped)),
                            egui::pos2(col_x(idx) + day_width - 2.0, y_of(snapped + 60)),
                        );
                        let ghost_color = Color32::from_rgba_unmultiplied(0x61, 0xAF, 0xEF, 40);
                        let ghost_border = Color32::from_rgba_unmultiplied(0x61, 0xAF, 0xEF, 100);
                        ui.painter().rect(ghost_rect, 4.0, ghost_color, egui::Stroke::new(1.0, ghost_border));
                        ui.painter().text(
                            ghost_rect.center(),
                            egui::Align2::CENTER_CENTER,
                            format!("{} + 1h", format_clock_time(start, clock_format)),
                            egui::FontId::proportional(12.0),
                            Color32::from_rgba_unmultiplied(255, 255, 255, 120),
                        );
                    }
                }
            }

            if col_response.double_clicked() && !over_block && !on_vacation {
                if let Some(pos) = col_response.interact_pointer_pos() {
                    let snapped = (minute_at(pos.y) / 15) * 15;
                    result.add_at = Some((*day, TimeOfDay::from_minutes(snapped)));
                }
            } else if col_response.clicked() {
                if let Some(pos) = col_response.interact_pointer_pos() {
                    if on_vacation {
                        result.clicked_vacation = Some(date);
                    } else if let Some(shift) = state.shift_at(*day, minute_at(pos.y)) {
                        result.clicked_shift = Some(shift);
                    }
                }
            }
        }
    });

    result
}

/// Paint one merged block (no interaction - that's handled by caller)
fn paint_block(
    ui: &Ui,
    rect: egui::Rect,
    view: &ViewBlock,
    time_format: TimeFormat,
    clock_format: ClockFormat,
) {
    let painter = ui.painter();

    let kind = if view.members.iter().all(|s| s.kind == ShiftKind::Overtime) {
        ShiftKind::Overtime
    } else {
        ShiftKind::Regular
    };
    let accent_color = shift_color(kind);
    let border = if view.draft { draft_color() } else { accent_color };

    let corner_radius = 4.0;
    painter.rect(
        rect,
        corner_radius,
        Color32::from_rgb(0x1c, 0x1c, 0x1a),
        egui::Stroke::new(if view.draft { 2.0 } else { 1.0 }, border),
    );

    // Left accent stripe
    let accent_width = 3.0;
    let accent_rect = egui::Rect::from_min_size(rect.min, egui::vec2(accent_width, rect.height()));
    painter.rect(
        accent_rect,
        egui::Rounding {
            nw: corner_radius,
            sw: corner_radius,
            ne: 0.0,
            se: 0.0,
        },
        accent_color,
        egui::Stroke::NONE,
    );

    let text_left = rect.min.x + accent_width + 4.0;
    let font = egui::FontId::proportional(12.0);

    if rect.height() > 16.0 {
        let span = format_span(view.block.start(), view.block.end(), clock_format);
        painter.text(
            egui::pos2(text_left, rect.min.y + 3.0),
            egui::Align2::LEFT_TOP,
            span,
            font.clone(),
            Color32::from_rgb(200, 200, 192),
        );
    }

    if rect.height() > 34.0 {
        let mut line = format_minutes_with_format(view.block.duration_minutes(), time_format);
        if view.draft {
            line.push_str(" · unsaved");
        }
        painter.text(
            egui::pos2(text_left, rect.min.y + 19.0),
            egui::Align2::LEFT_TOP,
            line,
            egui::FontId::new(12.0, bold_family()),
            Color32::WHITE,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_durations() {
        assert_eq!(format_minutes(0), "0m");
        assert_eq!(format_minutes(45), "45m");
        assert_eq!(format_minutes(480), "8h");
        assert_eq!(format_minutes(2310), "38h 30m");
        assert_eq!(format_minutes_with_format(2310, TimeFormat::Decimal), "38.5h");
        assert_eq!(format_minutes_with_format(20, TimeFormat::Decimal), "0.33h");
        assert_eq!(format_minutes_with_format(120, TimeFormat::Decimal), "2h");
    }

    #[test]
    fn night_block_spills_into_next_column() {
        let block = Block {
            day: Weekday::Mon,
            start_min: 22 * 60,
            end_min: 30 * 60,
        };
        assert_eq!(day_parts(&block), vec![(0, 1320, 1440), (1, 0, 360)]);

        let sunday = Block { day: Weekday::Sun, ..block };
        assert_eq!(day_parts(&sunday), vec![(6, 1320, 1440)]);
    }
}
