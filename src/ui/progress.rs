use std::time::Instant;

use eframe::egui;
use egui::Color32;

const BAR_HEIGHT: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Rush,     // 0 -> 17% in 0.25s
    Crawl,    // 17% -> 50% over 7.5s
    Complete, // snap to 100%
    Fade,
    Retract,  // shrink back on failure
}

/// Indeterminate bar pinned to the top of the window while a request runs.
#[derive(Debug)]
pub struct ProgressBar {
    value: f32,
    phase: Phase,
    since: Instant,
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self {
            value: 0.0,
            phase: Phase::Idle,
            since: Instant::now(),
        }
    }
}

impl ProgressBar {
    pub fn start(&mut self) {
        self.value = 0.0;
        self.enter(Phase::Rush);
    }

    pub fn finish(&mut self, success: bool) {
        self.enter(if success { Phase::Complete } else { Phase::Retract });
    }

    pub fn is_active(&self) -> bool {
        self.phase != Phase::Idle
    }

    fn enter(&mut self, phase: Phase) {
        self.phase = phase;
        self.since = Instant::now();
    }

    /// Advances the animation and asks for another frame while it runs.
    pub fn tick(&mut self, ctx: &egui::Context) {
        let elapsed = self.since.elapsed().as_secs_f32();
        match self.phase {
            Phase::Idle => return,
            Phase::Rush => {
                self.value = (elapsed / 0.25 * 0.17).min(0.17);
                if elapsed >= 0.25 {
                    self.enter(Phase::Crawl);
                }
            }
            Phase::Crawl => self.value = 0.17 + (elapsed / 7.5 * 0.33).min(0.33),
            Phase::Complete => {
                self.value += (1.0 - self.value) * (elapsed / 0.15).min(1.0);
                if elapsed >= 0.15 {
                    self.value = 1.0;
                    self.enter(Phase::Fade);
                }
            }
            Phase::Fade => {
                if elapsed >= 0.3 {
                    self.reset();
                }
            }
            Phase::Retract => {
                self.value *= 1.0 - (elapsed / 0.2).min(1.0);
                if elapsed >= 0.2 {
                    self.reset();
                }
            }
        }
        ctx.request_repaint();
    }

    fn reset(&mut self) {
        self.value = 0.0;
        self.phase = Phase::Idle;
    }

    /// Always reserves the row so the layout does not jump.
    pub fn show(&self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(
            egui::vec2(ui.available_width(), BAR_HEIGHT),
            egui::Sense::hover(),
        );
        if !self.is_active() || self.value <= 0.0 || !ui.is_rect_visible(rect) {
            return;
        }
        let alpha = match self.phase {
            Phase::Fade => {
                let t = self.since.elapsed().as_secs_f32() / 0.3;
                ((1.0 - t).clamp(0.0, 1.0) * 255.0) as u8
            }
            _ => 255,
        };
        let filled = egui::Rect::from_min_size(rect.min, egui::vec2(rect.width() * self.value, BAR_HEIGHT));
        ui.painter()
            .rect_filled(filled, 0.0, Color32::from_rgba_unmultiplied(255, 255, 255, alpha));
    }
}
