use chrono::{Datelike, Local, NaiveDate};
use eframe::egui;
use egui::{Color32, RichText};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::{parse_date, ApiError, EmployeeContext, ScheduleClient};
use crate::config::{ClockFormat, Config, TimeFormat, WeekChangePolicy};
use crate::schedule::{
    commit, fetch_saved, CommitPlan, CommitReport, EditForm, Editor, ExceptionMode, Interaction,
    SavedWeek, ScheduleError, ScheduleState, ScheduleStatus, ShiftKind, SyncError, TimeOfDay,
    VacationScope, Validity, Week, WeekSwitch, Weekday,
};
use crate::session::{Session, UserProfile};
use super::progress::ProgressBar;
use super::views::{self, format_minutes_with_format, format_span};

pub struct ShiftboxApp {
    config: Config,
    state: AppState,

    // Backend
    client: Option<Arc<ScheduleClient>>,
    session: Option<Session>,
    context: EmployeeContext,
    connecting: bool,

    // Editor
    schedule: ScheduleState,
    editor: Editor,
    edit_form: EditForm,
    pending_week: Option<Week>,

    // Add shift dialog
    show_add_dialog: bool,
    add_days: [bool; 7],
    add_start: String,
    add_end: String,
    add_kind: ShiftKind,
    add_valid_from: String,
    add_valid_to: String,
    add_error: Option<String>,

    // Add vacation dialog
    show_vacation_dialog: bool,
    vacation_from: String,
    vacation_to: String,
    vacation_error: Option<String>,

    // Settings dialog
    show_settings: bool,
    settings_url: String,
    settings_token: String,
    settings_company: String,
    settings_employee: String,
    settings_branch: String,
    settings_font_scale: f32,
    settings_time_format: TimeFormat,
    settings_clock_format: ClockFormat,
    settings_start_hour: u8,
    settings_end_hour: u8,

    // Status
    status_message: Option<(String, bool)>, // (message, is_error)
    loading: bool,
    is_offline: bool,

    progress: ProgressBar,

    // Async communication
    runtime: tokio::runtime::Runtime,
    result_rx: Receiver<AsyncResult>,
    result_tx: Sender<AsyncResult>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum AppState {
    Setup,
    Main,
}

enum AsyncResult {
    Connected(Arc<ScheduleClient>, EmployeeContext, Option<UserProfile>),
    WeekLoaded(Week, SavedWeek),
    Synced(CommitReport),
    SyncFailed(SyncError),
    Error(String),
    Offline,
}

/// What the user picked in a gesture popup, applied after the window closes.
enum GestureAction {
    Edit,
    Delete,
    DeleteScope(ExceptionMode),
    VacationScope(VacationScope),
    UpdateEdit,
    SaveEdit,
    Cancel,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn dialog_frame() -> egui::Frame {
    let (content_bg, frame_color, _) = super::theme::dialog_colors();
    egui::Frame::none()
        .fill(content_bg)
        .stroke(egui::Stroke::new(2.0, frame_color))
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::same(20.0))
}

/// Subdued custom-painted button, lighter on hover.
fn dialog_button(ui: &mut egui::Ui, text: &str, text_color: Color32) -> bool {
    let (btn_bg, _) = super::theme::button_colors();
    let btn_hover = ui.visuals().widgets.hovered.bg_fill;
    let font_id = egui::FontId::proportional(15.0);
    let padding = egui::vec2(16.0, 8.0);

    let size = ui.fonts(|f| f.layout_no_wrap(text.to_string(), font_id.clone(), text_color).size());
    let (rect, response) = ui.allocate_exact_size(size + padding * 2.0, egui::Sense::click());
    let bg = if response.hovered() { btn_hover } else { btn_bg };
    ui.painter().rect_filled(rect, egui::Rounding::same(6.0), bg);
    ui.painter().text(rect.center(), egui::Align2::CENTER_CENTER, text, font_id, text_color);
    response.clicked()
}

/// Glyph label that behaves like a link: pointer cursor, click sense.
fn clickable_icon(ui: &mut egui::Ui, icon: &str, color: Color32) -> bool {
    let response = ui.add(
        egui::Label::new(RichText::new(icon).size(14.0).color(color)).sense(egui::Sense::click()),
    );
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
    }
    response.clicked()
}

/// Gray icon button, white on hover.
fn icon_button(ui: &mut egui::Ui, icon: &str, hover_text: &str) -> bool {
    let text_color = Color32::from_rgb(150, 150, 150);
    let font_id = egui::FontId::proportional(18.0);
    let icon_size = ui.fonts(|f| f.layout_no_wrap(icon.to_string(), font_id.clone(), Color32::WHITE).size());
    let (rect, response) = ui.allocate_exact_size(icon_size + egui::vec2(8.0, 4.0), egui::Sense::click());
    let col = if response.hovered() { Color32::WHITE } else { text_color };
    ui.painter().text(rect.center(), egui::Align2::CENTER_CENTER, icon, font_id, col);
    response.on_hover_text(hover_text).clicked()
}

fn parse_optional_date(text: &str) -> Result<Option<NaiveDate>, ScheduleError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    parse_date(text)
        .map(Some)
        .ok_or_else(|| ScheduleError::InvalidDate(text.to_string()))
}

impl ShiftboxApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "could not load config, using defaults");
            Config::default()
        });
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);
        let state = if config.is_configured() {
            AppState::Main
        } else {
            AppState::Setup
        };

        let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
        let (result_tx, result_rx) = channel();

        let mut app = Self {
            show_settings: false,
            settings_url: config.api_base_url.clone(),
            settings_token: String::new(),
            settings_company: config.company_id.clone(),
            settings_employee: config.employee_id.clone(),
            settings_branch: config.branch_id.clone().unwrap_or_default(),
            settings_font_scale: config.font_scale,
            settings_time_format: config.time_format,
            settings_clock_format: config.clock_format,
            settings_start_hour: config.schedule_start_hour,
            settings_end_hour: config.schedule_end_hour,
            config,
            state,
            client: None,
            session: None,
            context: EmployeeContext::default(),
            connecting: false,
            schedule: ScheduleState::new(Week::containing(today())),
            editor: Editor::new(),
            edit_form: EditForm::default(),
            pending_week: None,
            show_add_dialog: false,
            add_days: [false; 7],
            add_start: String::new(),
            add_end: String::new(),
            add_kind: ShiftKind::Regular,
            add_valid_from: String::new(),
            add_valid_to: String::new(),
            add_error: None,
            show_vacation_dialog: false,
            vacation_from: String::new(),
            vacation_to: String::new(),
            vacation_error: None,
            status_message: None,
            loading: false,
            is_offline: false,
            progress: ProgressBar::default(),
            runtime,
            result_rx,
            result_tx,
        };

        if state == AppState::Main {
            app.connect();
        }

        app
    }

    fn report_api_error(tx: &Sender<AsyncResult>, context: &str, e: &ApiError) {
        if e.is_offline() {
            let _ = tx.send(AsyncResult::Offline);
        } else {
            let _ = tx.send(AsyncResult::Error(format!("{}: {}", context, e)));
        }
    }

    fn check_async_results(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            match result {
                AsyncResult::Connected(client, context, profile) => {
                    self.connecting = false;
                    self.client = Some(client);
                    self.context = context;
                    if let Some(profile) = profile {
                        self.session = self.session.take().map(|s| s.with_user(profile));
                    }
                    self.load_week(self.schedule.week());
                }
                AsyncResult::WeekLoaded(week, saved) => {
                    self.loading = false;
                    self.is_offline = false;
                    self.progress.finish(true);
                    if week == self.schedule.week() {
                        self.schedule.replace_saved(saved);
                    } else {
                        info!(loaded = %week.start(), shown = %self.schedule.week().start(), "dropping stale week");
                    }
                }
                AsyncResult::Synced(report) => {
                    self.loading = false;
                    self.schedule.finish_sync(true);
                    self.progress.finish(true);
                    self.status_message = Some((
                        format!("Schedule saved ({} changes)", report.changes()),
                        false,
                    ));
                    // The backend is authoritative; re-read what it stored.
                    self.load_week(self.schedule.week());
                }
                AsyncResult::SyncFailed(e) => {
                    self.loading = false;
                    self.schedule.finish_sync(false);
                    if let Some(id) = e.schedule_id.clone() {
                        self.schedule.remember_schedule_id(id);
                    }
                    self.progress.finish(false);
                    self.is_offline = e.source.is_offline();
                    self.status_message = Some((format!("Could not save: {}", e), true));
                }
                AsyncResult::Error(msg) => {
                    self.loading = false;
                    self.connecting = false;
                    self.is_offline = false;
                    self.status_message = Some((msg, true));
                    self.progress.finish(false);
                }
                AsyncResult::Offline => {
                    self.loading = false;
                    self.connecting = false;
                    self.is_offline = true;
                    self.status_message = None;
                    self.progress.finish(false);
                }
            }
        }
    }

    /// Builds the session and client from the config and resolves the
    /// company, employee and branch.
    fn connect(&mut self) {
        if self.connecting {
            return;
        }
        self.client = None;

        let session = match Session::from_config(&self.config) {
            Ok(session) => session,
            Err(e) => {
                self.status_message = Some((e.to_string(), true));
                return;
            }
        };
        let client = match ScheduleClient::new(&self.config, &session) {
            Ok(client) => client,
            Err(e) => {
                self.status_message = Some((e.to_string(), true));
                return;
            }
        };
        self.session = Some(session);
        self.connecting = true;
        self.loading = true;
        self.progress.start();

        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match client.connect().await {
                Ok((client, context)) => {
                    let profile = match client.fetch_profile().await {
                        Ok(profile) => Some(profile),
                        Err(e) => {
                            info!(error = %e, "no user profile");
                            None
                        }
                    };
                    let _ = tx.send(AsyncResult::Connected(Arc::new(client), context, profile));
                }
                Err(e) => {
                    error!(error = %e, "connect failed");
                    Self::report_api_error(&tx, "Could not load employee", &e);
                }
            }
        });
    }

    fn refresh_data(&mut self) {
        if self.schedule.is_syncing() {
            return;
        }
        if self.client.is_none() {
            self.connect();
        } else {
            self.load_week(self.schedule.week());
        }
    }

    fn load_week(&mut self, week: Week) {
        let Some(client) = self.client.clone() else {
            return;
        };

        self.loading = true;
        self.progress.start();

        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match fetch_saved(client.as_ref(), week).await {
                Ok(saved) => {
                    let _ = tx.send(AsyncResult::WeekLoaded(week, saved));
                }
                Err(e) => {
                    error!(week = %week.start(), error = %e, "week load failed");
                    Self::report_api_error(&tx, "Could not load the week", &e);
                }
            }
        });
    }

    /// Changes the displayed week, asking first when edits would be lost.
    fn navigate(&mut self, week: Week) {
        if week == self.schedule.week() {
            return;
        }
        match self.config.week_change_policy {
            WeekChangePolicy::WarnAndDiscard => match self.schedule.request_week(week) {
                Ok(WeekSwitch::Switched(week)) => {
                    self.editor.reset(&mut self.schedule);
                    self.load_week(week);
                }
                Ok(WeekSwitch::NeedsConfirmation(week)) => {
                    self.pending_week = Some(week);
                }
                Err(e) => self.status_message = Some((e.to_string(), true)),
            },
        }
    }

    fn discard_and_navigate(&mut self, week: Week) {
        match self.schedule.discard_and_switch(week) {
            Ok(()) => {
                self.editor.reset(&mut self.schedule);
                self.load_week(week);
            }
            Err(e) => self.status_message = Some((e.to_string(), true)),
        }
    }

    fn confirm_schedule(&mut self) {
        let Some(client) = self.client.clone() else {
            self.status_message = Some(("Not connected".to_string(), true));
            return;
        };

        let plan = CommitPlan::from_state(&self.schedule);
        if plan.is_empty() {
            self.status_message = Some(("Nothing to save".to_string(), false));
            return;
        }
        if let Err(e) = self.schedule.begin_sync() {
            self.status_message = Some((e.to_string(), true));
            return;
        }
        self.editor.reset(&mut self.schedule);
        self.status_message = None;
        self.loading = true;
        self.progress.start();

        let tx = self.result_tx.clone();
        self.runtime.spawn(async move {
            match commit(client.as_ref(), &plan).await {
                Ok(report) => {
                    let _ = tx.send(AsyncResult::Synced(report));
                }
                Err(e) => {
                    let _ = tx.send(AsyncResult::SyncFailed(e));
                }
            }
        });
    }

    fn save_settings(&mut self) {
        let branch = self.settings_branch.trim();
        let connection_changed = self.config.api_base_url != self.settings_url.trim()
            || self.config.company_id != self.settings_company.trim()
            || self.config.employee_id != self.settings_employee.trim()
            || self.config.branch_id.as_deref().unwrap_or("") != branch
            || !self.settings_token.is_empty();

        self.config.api_base_url = self.settings_url.trim().to_string();
        self.config.company_id = self.settings_company.trim().to_string();
        self.config.employee_id = self.settings_employee.trim().to_string();
        self.config.branch_id = (!branch.is_empty()).then(|| branch.to_string());
        self.config.font_scale = self.settings_font_scale;
        self.config.time_format = self.settings_time_format;
        self.config.clock_format = self.settings_clock_format;
        self.config.schedule_start_hour = self.settings_start_hour;
        self.config.schedule_end_hour = self.settings_end_hour;

        if !self.settings_token.is_empty() {
            self.config.api_token = Some(self.settings_token.trim().to_string());
        }

        match self.config.save() {
            Ok(_) => {
                self.show_settings = false;
                if self.config.is_configured() && self.state == AppState::Setup {
                    self.state = AppState::Main;
                }
                if connection_changed && self.config.is_configured() {
                    self.connect();
                }
            }
            Err(e) => {
                self.status_message = Some((format!("Failed to save: {}", e), true));
            }
        }
    }

    fn open_settings(&mut self) {
        self.settings_url = self.config.api_base_url.clone();
        self.settings_token = String::new();
        self.settings_company = self.config.company_id.clone();
        self.settings_employee = self.config.employee_id.clone();
        self.settings_branch = self.config.branch_id.clone().unwrap_or_default();
        self.settings_font_scale = self.config.font_scale;
        self.settings_time_format = self.config.time_format;
        self.settings_clock_format = self.config.clock_format;
        self.settings_start_hour = self.config.schedule_start_hour;
        self.settings_end_hour = self.config.schedule_end_hour;
        self.show_settings = true;
    }

    fn open_add_dialog(&mut self, day: Option<Weekday>, start: Option<TimeOfDay>) {
        self.add_days = [false; 7];
        if let Some(day) = day {
            self.add_days[day.index()] = true;
        }
        self.add_start = start.map(|t| t.to_string()).unwrap_or_default();
        self.add_end = start
            .map(|t| TimeOfDay::from_minutes(t.minutes() + 60).to_string())
            .unwrap_or_default();
        self.add_kind = ShiftKind::Regular;
        self.add_valid_from = String::new();
        self.add_valid_to = String::new();
        self.add_error = None;
        self.show_add_dialog = true;
    }

    fn save_add_dialog(&mut self) {
        let result = (|| {
            let days: Vec<Weekday> = Weekday::ALL
                .into_iter()
                .filter(|d| self.add_days[d.index()])
                .collect();
            let start = TimeOfDay::parse_input(&self.add_start)?;
            let end = TimeOfDay::parse_input(&self.add_end)?;
            let validity = Validity::new(
                parse_optional_date(&self.add_valid_from)?,
                parse_optional_date(&self.add_valid_to)?,
            )?;
            self.schedule.add_shifts(&days, start, end, self.add_kind, validity)
        })();

        match result {
            Ok(_) => {
                self.show_add_dialog = false;
                self.add_error = None;
            }
            Err(e) => self.add_error = Some(e.to_string()),
        }
    }

    fn open_vacation_dialog(&mut self) {
        let start = self.schedule.week().start().to_string();
        self.vacation_from = start.clone();
        self.vacation_to = start;
        self.vacation_error = None;
        self.show_vacation_dialog = true;
    }

    fn save_vacation_dialog(&mut self) {
        let result = (|| {
            let from = parse_optional_date(&self.vacation_from)?.ok_or(ScheduleError::MissingField("from date"))?;
            let to = parse_optional_date(&self.vacation_to)?.unwrap_or(from);
            self.schedule.add_vacation_range(from, to)
        })();

        match result {
            Ok(added) => {
                self.show_vacation_dialog = false;
                if added == 0 {
                    self.status_message = Some(("Those days are already vacation".to_string(), false));
                }
            }
            Err(e) => self.vacation_error = Some(e.to_string()),
        }
    }

    fn apply_gesture(&mut self, action: GestureAction) {
        let result = match action {
            GestureAction::Edit => {
                let result = self.editor.choose_edit(&mut self.schedule);
                if let Interaction::Editing { form, .. } = self.editor.interaction() {
                    self.edit_form = form.clone();
                }
                result
            }
            GestureAction::Delete => self.editor.choose_delete(&mut self.schedule),
            GestureAction::DeleteScope(mode) => self.editor.confirm_delete(&mut self.schedule, mode, today()),
            GestureAction::VacationScope(scope) => {
                self.editor.confirm_vacation_removal(&mut self.schedule, scope, today())
            }
            GestureAction::UpdateEdit => {
                let (start, end) = (self.edit_form.start.clone(), self.edit_form.end.clone());
                self.editor.update_edit(&mut self.schedule, &start, &end)
            }
            GestureAction::SaveEdit => self.editor.confirm_edit(&mut self.schedule),
            GestureAction::Cancel => self.editor.cancel(&mut self.schedule),
        };
        if let Err(e) = result {
            self.status_message = Some((e.to_string(), true));
        }
    }

    fn render_setup(&mut self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Shiftbox setup");
            ui.add_space(20.0);
            ui.label("Connect to the schedule service to edit an employee's week.");
            ui.add_space(20.0);
        });

        self.render_connection_grid(ui, "setup_grid");

        ui.add_space(20.0);

        if ui.button("Save and connect").clicked() {
            self.save_settings();
        }
    }

    fn render_connection_grid(&mut self, ui: &mut egui::Ui, id: &str) {
        egui::Grid::new(id)
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("API URL");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_url)
                        .hint_text("https://api.example.com")
                        .desired_width(350.0)
                );
                ui.end_row();

                ui.label("API token");
                let hint = if self.config.api_token.is_some() {
                    "Leave blank to keep existing"
                } else {
                    "Paste your access token here"
                };
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_token)
                        .password(true)
                        .hint_text(hint)
                        .desired_width(350.0)
                );
                ui.end_row();

                ui.label("Company ID");
                ui.add(egui::TextEdit::singleline(&mut self.settings_company).desired_width(200.0));
                ui.end_row();

                ui.label("Employee ID");
                ui.add(egui::TextEdit::singleline(&mut self.settings_employee).desired_width(200.0));
                ui.end_row();

                ui.label("Branch ID");
                ui.add(
                    egui::TextEdit::singleline(&mut self.settings_branch)
                        .hint_text("From the employee record")
                        .desired_width(200.0)
                );
                ui.end_row();
            });
    }

    fn render_week_navigator(&mut self, ui: &mut egui::Ui) {
        let (button_bg, button_text) = super::theme::button_colors();
        let week = self.schedule.week();
        let mut target: Option<Week> = None;

        egui::Frame::none()
            .fill(button_bg)
            .rounding(egui::Rounding::same(12.0))  // Pill-shaped
            .inner_margin(egui::Margin::symmetric(8.0, 4.0))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    if clickable_icon(ui, egui_phosphor::regular::CARET_LEFT, button_text) {
                        target = Some(week.previous());
                    }

                    ui.allocate_ui_with_layout(
                        egui::vec2(150.0, 14.0),
                        egui::Layout::centered_and_justified(egui::Direction::LeftToRight),
                        |ui| {
                            ui.label(RichText::new(week.label()).size(14.0).color(button_text));
                        }
                    );

                    if clickable_icon(ui, egui_phosphor::regular::CARET_RIGHT, button_text) {
                        target = Some(week.next());
                    }
                });
            });

        // Month and year selectors
        let start = week.start();
        let mut month = start.month();
        egui::ComboBox::from_id_salt("month_select")
            .width(70.0)
            .selected_text(start.format("%b").to_string())
            .show_ui(ui, |ui| {
                for m in 1..=12u32 {
                    let name = NaiveDate::from_ymd_opt(2000, m, 1)
                        .map(|d| d.format("%B").to_string())
                        .unwrap_or_default();
                    ui.selectable_value(&mut month, m, name);
                }
            });
        if month != start.month() {
            target = Some(week.with_month(month));
        }

        let current_year = today().year();
        let mut year = start.year();
        egui::ComboBox::from_id_salt("year_select")
            .width(60.0)
            .selected_text(year.to_string())
            .show_ui(ui, |ui| {
                for y in (current_year - 2)..=(current_year + 2) {
                    ui.selectable_value(&mut year, y, y.to_string());
                }
            });
        if year != start.year() {
            target = Some(week.with_year(year));
        }

        if ui.small_button("Today").clicked() {
            target = Some(Week::containing(today()));
        }

        if let Some(week) = target {
            self.navigate(week);
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        // Company / employee line
        ui.horizontal(|ui| {
            let company = self.context.company_name.as_deref().unwrap_or("");
            let employee = self.context.employee_name.as_deref().unwrap_or("Employee");
            ui.label(RichText::new(employee).size(18.0).color(Color32::WHITE));
            if !company.is_empty() {
                ui.label(RichText::new(company).color(Color32::from_rgb(140, 140, 160)));
            }
            if let Some(name) = self.session.as_ref().and_then(Session::display_name) {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format!("{} {}", egui_phosphor::regular::USER, name))
                        .size(12.0)
                        .color(Color32::from_rgb(120, 120, 130)));
                });
            }
        });

        // Header with week navigation
        ui.horizontal(|ui| {
            self.render_week_navigator(ui);

            if let Some(status) = self.schedule.saved().status {
                let (text, color) = match status {
                    ScheduleStatus::Draft => ("Draft", super::theme::draft_color()),
                    ScheduleStatus::Confirmed => ("Confirmed", super::theme::success_color()),
                };
                ui.label(RichText::new(text).size(12.0).color(color));
            }

            // Weekly totals - regular hours headline, overtime apart
            ui.add_space(16.0);
            let total = self.schedule.total_minutes();
            ui.label(
                RichText::new(format_minutes_with_format(total, self.config.time_format))
                    .size(14.0)
                    .color(Color32::WHITE)
                    .family(super::theme::bold_family())
            ).on_hover_text("Regular hours this week");
            let overtime = self.schedule.overtime_minutes();
            if overtime > 0 {
                ui.label(
                    RichText::new(format!("+{} extra", format_minutes_with_format(overtime, self.config.time_format)))
                        .size(13.0)
                        .color(super::theme::shift_color(ShiftKind::Overtime))
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if icon_button(ui, egui_phosphor::regular::FADERS_HORIZONTAL, "Settings") {
                    self.open_settings();
                }
                ui.add_space(8.0);
                let syncing = self.schedule.is_syncing();
                // Edits and saves are checked against the saved week, so they
                // wait for it.
                let ready = !syncing && !self.loading && self.schedule.is_loaded();
                if !syncing && icon_button(ui, egui_phosphor::regular::CLOUD_ARROW_DOWN, "Reload week") {
                    self.refresh_data();
                }
                ui.add_space(8.0);

                let pending = self.schedule.pending().len();
                let confirm_label = if syncing {
                    "Saving…".to_string()
                } else if pending > 0 {
                    format!("{} Confirm schedule ({})", egui_phosphor::regular::CHECK, pending)
                } else {
                    format!("{} Confirm schedule", egui_phosphor::regular::CHECK)
                };
                let confirm = ui.add_enabled(
                    ready && self.client.is_some(),
                    egui::Button::new(RichText::new(confirm_label).color(Color32::WHITE))
                        .fill(super::theme::accent())
                        .rounding(6.0)
                );
                if confirm.clicked() {
                    self.confirm_schedule();
                }

                ui.add_enabled_ui(ready, |ui| {
                    if ui.button(format!("{} Vacation", egui_phosphor::regular::AIRPLANE_TILT)).clicked() {
                        self.open_vacation_dialog();
                    }
                    if ui.button(format!("{} Add shift", egui_phosphor::regular::PLUS)).clicked() {
                        self.open_add_dialog(None, None);
                    }
                });
            });
        });

        ui.add_space(8.0);

        if self.is_offline {
            ui.add_space(40.0);
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(egui_phosphor::regular::WIFI_SLASH.to_string())
                        .size(34.0)
                        .color(super::theme::error_color())
                );
                ui.add_space(16.0);
                ui.label(RichText::new("No connection").size(20.0).color(Color32::from_rgb(200, 200, 210)));
                ui.add_space(8.0);
                ui.label(
                    RichText::new("Unsaved changes are kept. Check your connection and try again.")
                        .size(14.0)
                        .color(Color32::from_rgb(120, 120, 140))
                );
                ui.add_space(24.0);
                if ui.add(
                    egui::Button::new(
                        RichText::new(format!("{} Retry", egui_phosphor::regular::ARROWS_CLOCKWISE))
                            .size(17.0)
                            .color(Color32::WHITE)
                    )
                    .fill(super::theme::accent())
                    .rounding(6.0)
                ).clicked() {
                    self.is_offline = false;
                    self.refresh_data();
                }
            });
            return;
        }

        let grid = views::render_schedule_view(
            ui,
            &self.schedule,
            self.config.time_format,
            self.config.clock_format,
            self.config.visible_hours(),
        );

        if let Some(shift) = grid.clicked_shift {
            if let Err(e) = self.editor.click_shift(&self.schedule, shift) {
                self.status_message = Some((e.to_string(), true));
            }
        }
        if let Some(date) = grid.clicked_vacation {
            if let Err(e) = self.editor.click_vacation(&mut self.schedule, date) {
                self.status_message = Some((e.to_string(), true));
            }
        }
        if let Some((day, start)) = grid.add_at {
            if self.schedule.is_syncing() {
                self.status_message = Some((ScheduleError::Busy.to_string(), true));
            } else {
                self.open_add_dialog(Some(day), Some(start));
            }
        }
    }

    fn render_gesture_popup(&mut self, ctx: &egui::Context) {
        let interaction = self.editor.interaction().clone();
        let clock = self.config.clock_format;
        let mut action: Option<GestureAction> = None;

        let title = match &interaction {
            Interaction::Idle => return,
            Interaction::OptionsShown { .. } => "Shift",
            Interaction::DeleteScopeShown { .. } => "Remove shift",
            Interaction::Editing { .. } => "Edit shift",
            Interaction::VacationScopeShown { .. } => "Remove vacation",
        };

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                let text_color = Color32::from_rgb(180, 180, 190);
                match &interaction {
                    Interaction::Idle => {}
                    Interaction::OptionsShown { target } => {
                        ui.label(RichText::new(format!(
                            "{} {} · {}",
                            target.date.format("%a %-d %b"),
                            format_span(target.start(), target.end(), clock),
                            target.kind.label(),
                        )).size(14.0));
                        if target.is_draft() {
                            ui.label(RichText::new("Not saved yet").size(12.0).color(super::theme::draft_color()));
                        }
                        ui.add_space(16.0);
                        ui.horizontal(|ui| {
                            if dialog_button(ui, "Edit", text_color) {
                                action = Some(GestureAction::Edit);
                            }
                            if dialog_button(ui, "Delete", super::theme::error_color()) {
                                action = Some(GestureAction::Delete);
                            }
                            if dialog_button(ui, "Cancel", text_color) {
                                action = Some(GestureAction::Cancel);
                            }
                        });
                    }
                    Interaction::DeleteScopeShown { target } => {
                        ui.label(format!(
                            "Remove {} {}?",
                            target.date.format("%a %-d %b"),
                            format_span(target.start(), target.end(), clock),
                        ));
                        ui.add_space(16.0);
                        ui.vertical(|ui| {
                            for mode in [ExceptionMode::OnlyThisBlock, ExceptionMode::FromThisDayOn] {
                                if dialog_button(ui, mode.label(), super::theme::error_color()) {
                                    action = Some(GestureAction::DeleteScope(mode));
                                }
                            }
                            if dialog_button(ui, "Cancel", text_color) {
                                action = Some(GestureAction::Cancel);
                            }
                        });
                    }
                    Interaction::Editing { target, .. } => {
                        ui.label(format!(
                            "{} · was {}",
                            target.date.format("%a %-d %b"),
                            format_span(target.start(), target.end(), clock),
                        ));
                        ui.add_space(10.0);
                        egui::Grid::new("edit_grid")
                            .num_columns(2)
                            .spacing([12.0, 10.0])
                            .show(ui, |ui| {
                                ui.label("Start");
                                let start = ui.add(egui::TextEdit::singleline(&mut self.edit_form.start).desired_width(120.0));
                                ui.end_row();
                                ui.label("End");
                                let end = ui.add(egui::TextEdit::singleline(&mut self.edit_form.end).desired_width(120.0));
                                ui.end_row();
                                if start.changed() || end.changed() {
                                    action = Some(GestureAction::UpdateEdit);
                                }
                            });
                        ui.add_space(16.0);
                        ui.horizontal(|ui| {
                            if dialog_button(ui, "Save", text_color) {
                                action = Some(GestureAction::SaveEdit);
                            }
                            if dialog_button(ui, "Cancel", text_color) {
                                action = Some(GestureAction::Cancel);
                            }
                        });
                    }
                    Interaction::VacationScopeShown { date } => {
                        ui.label(format!("Remove vacation on {}?", date.format("%a %-d %b %Y")));
                        ui.add_space(16.0);
                        ui.vertical(|ui| {
                            for scope in [VacationScope::Single, VacationScope::Forward] {
                                if dialog_button(ui, scope.label(), super::theme::error_color()) {
                                    action = Some(GestureAction::VacationScope(scope));
                                }
                            }
                            if dialog_button(ui, "Cancel", text_color) {
                                action = Some(GestureAction::Cancel);
                            }
                        });
                    }
                }
            });

        if let Some(action) = action {
            self.apply_gesture(action);
        }
    }

    fn render_add_dialog(&mut self, ctx: &egui::Context) {
        let mut save = false;
        let mut close = false;

        egui::Window::new("Add shift")
            .collapsible(false)
            .resizable(false)
            .default_width(480.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                egui::Grid::new("add_shift_grid")
                    .num_columns(2)
                    .spacing([12.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("Days");
                        ui.horizontal(|ui| {
                            for day in Weekday::ALL {
                                ui.checkbox(&mut self.add_days[day.index()], day.symbol().to_string())
                                    .on_hover_text(day.short_name());
                            }
                        });
                        ui.end_row();

                        ui.label("Start");
                        ui.add(egui::TextEdit::singleline(&mut self.add_start).hint_text("9:00").desired_width(120.0));
                        ui.end_row();

                        ui.label("End");
                        ui.add(egui::TextEdit::singleline(&mut self.add_end).hint_text("17:00").desired_width(120.0));
                        ui.end_row();

                        ui.label("Type");
                        ui.horizontal(|ui| {
                            ui.radio_value(&mut self.add_kind, ShiftKind::Regular, ShiftKind::Regular.label());
                            ui.radio_value(&mut self.add_kind, ShiftKind::Overtime, ShiftKind::Overtime.label());
                        });
                        ui.end_row();

                        ui.label("Valid from");
                        ui.add(egui::TextEdit::singleline(&mut self.add_valid_from).hint_text("YYYY-MM-DD").desired_width(120.0));
                        ui.end_row();

                        ui.label("Valid to");
                        ui.add(egui::TextEdit::singleline(&mut self.add_valid_to).hint_text("YYYY-MM-DD").desired_width(120.0));
                        ui.end_row();
                    });

                if let Some(err) = &self.add_error {
                    ui.add_space(8.0);
                    ui.label(RichText::new(err).color(super::theme::error_color()));
                }

                ui.add_space(16.0);
                let text_color = Color32::from_rgb(180, 180, 190);
                ui.horizontal(|ui| {
                    save = dialog_button(ui, "Add", text_color);
                    close = dialog_button(ui, "Cancel", text_color);
                });
            });

        if save {
            self.save_add_dialog();
        }
        if close {
            self.show_add_dialog = false;
        }
    }

    fn render_vacation_dialog(&mut self, ctx: &egui::Context) {
        let mut save = false;
        let mut close = false;

        egui::Window::new("Add vacation")
            .collapsible(false)
            .resizable(false)
            .default_width(380.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                egui::Grid::new("vacation_grid")
                    .num_columns(2)
                    .spacing([12.0, 10.0])
                    .show(ui, |ui| {
                        ui.label("From");
                        ui.add(egui::TextEdit::singleline(&mut self.vacation_from).hint_text("YYYY-MM-DD").desired_width(120.0));
                        ui.end_row();
                        ui.label("To");
                        ui.add(egui::TextEdit::singleline(&mut self.vacation_to).hint_text("YYYY-MM-DD").desired_width(120.0));
                        ui.end_row();
                    });

                if let Some(err) = &self.vacation_error {
                    ui.add_space(8.0);
                    ui.label(RichText::new(err).color(super::theme::error_color()));
                }

                ui.add_space(16.0);
                let text_color = Color32::from_rgb(180, 180, 190);
                ui.horizontal(|ui| {
                    save = dialog_button(ui, "Add", text_color);
                    close = dialog_button(ui, "Cancel", text_color);
                });
            });

        if save {
            self.save_vacation_dialog();
        }
        if close {
            self.show_vacation_dialog = false;
        }
    }

    fn render_week_change_confirm(&mut self, ctx: &egui::Context, week: Week) {
        let mut discard = false;
        let mut stay = false;

        egui::Window::new("Unsaved changes")
            .collapsible(false)
            .resizable(false)
            .default_width(400.0)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .frame(dialog_frame())
            .show(ctx, |ui| {
                ui.label(format!(
                    "{} unsaved changes will be lost if you open {}.",
                    self.schedule.pending().len(),
                    week.label()
                ));
                ui.add_space(16.0);
                ui.horizontal(|ui| {
                    discard = dialog_button(ui, "Discard and continue", super::theme::error_color());
                    stay = dialog_button(ui, "Stay", Color32::from_rgb(180, 180, 190));
                });
            });

        if discard {
            self.pending_week = None;
            self.discard_and_navigate(week);
        }
        if stay {
            self.pending_week = None;
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        let section_color = Color32::from_rgb(140, 140, 160);

        ui.label(RichText::new("Connection").color(section_color).strong());
        ui.add_space(8.0);
        self.render_connection_grid(ui, "connection_grid");

        ui.add_space(20.0);

        ui.label(RichText::new("Display").color(section_color).strong());
        ui.add_space(8.0);

        egui::Grid::new("display_grid")
            .num_columns(2)
            .spacing([20.0, 10.0])
            .show(ui, |ui| {
                ui.label("Font scale");
                ui.horizontal(|ui| {
                    ui.add(egui::Slider::new(&mut self.settings_font_scale, 0.75..=2.0).show_value(false));
                    ui.label(format!("{:.0}%", self.settings_font_scale * 100.0));
                });
                ui.end_row();

                ui.label("Duration format");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.settings_time_format, TimeFormat::HoursMinutes, "38h 30m");
                    ui.radio_value(&mut self.settings_time_format, TimeFormat::Decimal, "38.5h");
                });
                ui.end_row();

                ui.label("Clock format");
                ui.horizontal(|ui| {
                    ui.radio_value(&mut self.settings_clock_format, ClockFormat::Hour24, "14:30");
                    ui.radio_value(&mut self.settings_clock_format, ClockFormat::Hour12, "2:30pm");
                });
                ui.end_row();

                ui.label("Visible hours");
                ui.horizontal(|ui| {
                    ui.add(egui::DragValue::new(&mut self.settings_start_hour).range(0..=23));
                    ui.label("to");
                    ui.add(egui::DragValue::new(&mut self.settings_end_hour).range(1..=24));
                });
                ui.end_row();
            });

        ui.add_space(24.0);

        let text_color = Color32::from_rgb(180, 180, 190);
        ui.horizontal(|ui| {
            if dialog_button(ui, "Save", text_color) {
                self.save_settings();
            }
            if dialog_button(ui, "Cancel", text_color) {
                self.show_settings = false;
            }
        });
    }
}

impl eframe::App for ShiftboxApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = (self.config.font_scale * zoom_delta).clamp(0.75, 2.5);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "could not save font scale");
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.check_async_results();
        self.progress.tick(ctx);

        if self.state == AppState::Main {
            self.render_gesture_popup(ctx);

            if self.show_add_dialog {
                self.render_add_dialog(ctx);
            }
            if self.show_vacation_dialog {
                self.render_vacation_dialog(ctx);
            }
            if let Some(week) = self.pending_week {
                self.render_week_change_confirm(ctx, week);
            }
        }

        if self.show_settings {
            egui::Window::new("Settings")
                .collapsible(false)
                .resizable(false)
                .default_width(600.0)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .frame(dialog_frame())
                .show(ctx, |ui| {
                    self.render_settings(ui);
                });
        }

        egui::CentralPanel::default().frame(
            egui::Frame::none().inner_margin(egui::Margin::symmetric(12.0, 0.0))
        ).show(ctx, |ui| {
            self.progress.show(ui);

            // Status message - selectable with copy and close buttons
            let mut dismiss_message = false;
            let mut copy_message: Option<String> = None;
            if !self.loading {
                if let Some((msg, is_error)) = &self.status_message {
                    let color = if *is_error {
                        super::theme::error_color()
                    } else {
                        super::theme::success_color()
                    };
                    let dim_color = Color32::from_rgb(120, 120, 130);
                    ui.horizontal(|ui| {
                        ui.add(egui::Label::new(RichText::new(msg).color(color)));
                        ui.add_space(8.0);

                        if clickable_icon(ui, egui_phosphor::regular::COPY, dim_color) {
                            copy_message = Some(msg.clone());
                        }
                        if clickable_icon(ui, egui_phosphor::regular::X, dim_color) {
                            dismiss_message = true;
                        }
                    });
                    ui.add_space(8.0);
                }
            }
            if let Some(text) = copy_message {
                ui.ctx().copy_text(text);
            }
            if dismiss_message {
                self.status_message = None;
            }

            match self.state {
                AppState::Setup => self.render_setup(ui),
                AppState::Main => self.render_main(ui),
            }
        });
    }
}
