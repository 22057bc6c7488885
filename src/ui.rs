use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::io;
use std::time::Duration as StdDuration;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime};
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, ExecutableCommand};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};
use ratatui::{Frame, Terminal};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::calendar::{
	company_year_months, company_year_start, count_weekdays, first_day_of_month, last_day_of_month,
	shift_month, week_end, week_month, week_start, weeks_in_month,
};
use crate::domain::{
	allocation_status, hours_from_minutes, minutes_from_hours, AdjustType, AllocationStatus,
	Config, Ticket, TicketAllocation, TimeEntry, WeekTotals,
};
use crate::holidays::holiday_name;
use crate::storage::{StorageError, Store};

const FOCUSED_PANEL_BORDER_COLOR: Color = Color::Yellow;
const INACTIVE_PANEL_BORDER_COLOR: Color = Color::DarkGray;
const HIGHLIGHT_BACKGROUND_COLOR: Color = Color::Rgb(42, 45, 52);

const DAY_FIELD_CLOCK_IN: usize = 0;
const DAY_FIELD_LUNCH: usize = 1;
const DAY_FIELD_CLOCK_OUT: usize = 2;
const DAY_FIELD_ADJUSTMENT: usize = 3;
const DAY_FIELD_TYPE: usize = 4;
const DAY_FIELD_COMMENT: usize = 5;

pub fn run_dashboard(store: &Store) -> Result<(), Box<dyn Error>> {
	enable_raw_mode()?;
	let mut stdout = io::stdout();
	stdout.execute(EnterAlternateScreen)?;
	let backend = CrosstermBackend::new(stdout);
	let mut terminal = Terminal::new(backend)?;

	let result = run_event_loop(&mut terminal, store);

	disable_raw_mode()?;
	execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
	terminal.show_cursor()?;
	result
}

fn run_event_loop(
	terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
	store: &Store,
) -> Result<(), Box<dyn Error>> {
	let mut app = App::new(store)?;
	loop {
		let view = build_view(&app, store)?;
		app.clamp_selection(&view);
		terminal.draw(|frame| draw_dashboard(frame, &app, &view))?;

		if event::poll(StdDuration::from_millis(250))? {
			if let CEvent::Key(key) = event::read()? {
				if key.kind != KeyEventKind::Press {
					continue;
				}
				let should_quit = match &app.mode {
					InputMode::Form(_) => handle_form_key(&mut app, key.code, store),
					InputMode::Select(_) => handle_select_key(&mut app, key.code, store),
					InputMode::Normal => handle_normal_key(&mut app, key.code, store, &view),
				};
				if should_quit {
					break;
				}
			}
		}
	}
	Ok(())
}

fn draw_dashboard(frame: &mut Frame, app: &App, view: &ViewModel) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(12), Constraint::Length(5)])
		.split(frame.area());

	match &view.body {
		BodyView::Week => render_week_view(frame, layout[0], app, &view.week),
		BodyView::Month(month) => render_month_view(frame, layout[0], app, month),
		BodyView::Year(year) => render_year_view(frame, layout[0], app, year),
		BodyView::Day(day) => render_day_view(frame, layout[0], app, day),
		BodyView::Allocations(allocations) => {
			render_allocations_view(frame, layout[0], app, allocations)
		}
		BodyView::Tickets(tickets) => render_tickets_view(frame, layout[0], app, tickets),
	}
	render_footer(frame, layout[1], app);

	if let InputMode::Form(form) = &app.mode {
		render_form_popup(frame, form);
	}
	if let InputMode::Select(select) = &app.mode {
		render_select_popup(frame, select);
	}
}

fn render_week_view(frame: &mut Frame, area: Rect, app: &App, week: &WeekView) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Min(11), Constraint::Length(9)])
		.split(area);

	let nav = format!(
		"◄ {}/{} ({} - {}) ►",
		week.number,
		week.count,
		week.start.format("%b %d"),
		week.end.format("%b %d"),
	);
	let mut items = vec![
		ListItem::new(Line::from(Span::styled(
			nav,
			Style::default().fg(Color::DarkGray),
		))),
		ListItem::new(Line::from(Span::styled(
			week_row_text(
				"Day", "Date", "In", "Lunch", "Out", "Worked", "Adj", "Type", "A", "Comment",
			),
			Style::default().add_modifier(Modifier::BOLD),
		))),
	];
	for row in &week.rows {
		items.push(ListItem::new(week_row_line(row)));
	}

	let title = format!("WEEK {}: {}", week.number, week.month_label);
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(title)
				.border_style(border_style(matches!(app.mode, InputMode::Normal))),
		)
		.highlight_style(
			Style::default()
				.bg(HIGHLIGHT_BACKGROUND_COLOR)
				.add_modifier(Modifier::BOLD),
		);
	let mut state = ListState::default();
	state.select(Some(app.day_cursor + 2));
	frame.render_stateful_widget(list, layout[0], &mut state);

	let summary = Paragraph::new(summary_lines(week, &app.config))
		.block(Block::default().borders(Borders::ALL).title("Summary"));
	frame.render_widget(summary, layout[1]);
}

fn week_row_text(
	day: &str,
	date: &str,
	clock_in: &str,
	lunch: &str,
	clock_out: &str,
	worked: &str,
	adjusted: &str,
	adjust_type: &str,
	marker: &str,
	comment: &str,
) -> String {
	format!(
		"{day:<4} {date:<10} {clock_in:>6} {lunch:>6} {clock_out:>6} {worked:>8} {adjusted:>7}  {adjust_type:^4} {marker:^3} {comment}"
	)
}

fn week_row_line(row: &WeekRow) -> Line<'static> {
	let date_cell = if row.outside_month {
		format!("({})", row.date.format("%b %d"))
	} else {
		row.date.format("%b %d").to_string()
	};
	let marker = allocation_status(row.entry.worked_hours(), row.allocated).marker();
	let text = week_row_text(
		&row.entry.day_of_week,
		&date_cell,
		&format_clock_cell(row.entry.clock_in),
		&format_lunch_cell(row.entry.lunch_minutes),
		&format_clock_cell(row.entry.clock_out),
		&format_hours_cell(row.entry.worked_hours()),
		&format_hours_cell(row.entry.adjusted_hours()),
		row.entry.adjust_type.map(AdjustType::code).unwrap_or(""),
		marker,
		&format_comment_cell(row.entry.comment.as_deref()),
	);
	if row.weekend {
		Line::from(Span::styled(
			text,
			Style::default().add_modifier(Modifier::DIM),
		))
	} else {
		Line::from(text)
	}
}

fn summary_lines(week: &WeekView, config: &Config) -> Vec<Line<'static>> {
	let standard_day = config.standard_day_hours;
	let worked = week.totals.worked;
	let pct = if week.target > Decimal::ZERO {
		worked.to_f64().unwrap_or(0.0) / week.target.to_f64().unwrap_or(1.0) * 100.0
	} else {
		0.0
	};
	vec![
		summary_line("Worked", worked, standard_day, false),
		Line::from(format!(
			"{}   ({pct:.1}%)",
			summary_text("of target max", week.target, standard_day),
		)),
		summary_line("Leave", week.totals.leave, standard_day, true),
		summary_line("Sick", week.totals.sick, standard_day, true),
		summary_line("Training", week.totals.training, standard_day, true),
		summary_line("P/H", week.totals.public_holiday, standard_day, true),
		summary_line("TOTAL", week.totals.total(), standard_day, false),
	]
}

fn summary_text(label: &str, hours: Decimal, standard_day: Decimal) -> String {
	let days = hours
		.checked_div(standard_day)
		.unwrap_or(Decimal::ZERO)
		.round_dp(2);
	format!(
		"{label:>14}  {:>6}h  ({:>5}d)",
		format_g(hours),
		format_g(days),
	)
}

fn summary_line(
	label: &str,
	hours: Decimal,
	standard_day: Decimal,
	dim_when_zero: bool,
) -> Line<'static> {
	let text = summary_text(label, hours, standard_day);
	if dim_when_zero && hours.is_zero() {
		Line::from(Span::styled(
			text,
			Style::default().add_modifier(Modifier::DIM),
		))
	} else {
		Line::from(text)
	}
}

fn render_month_view(frame: &mut Frame, area: Rect, app: &App, month: &MonthView) {
	let mut lines = vec![Line::from(Span::styled(
		format!(
			"{:<19} {:>9} {:>9} {:>9}",
			"Week", "Worked", "Adjusted", "Total"
		),
		Style::default().add_modifier(Modifier::BOLD),
	))];
	for row in &month.rows {
		let adjusted = row.totals.total() - row.totals.worked;
		lines.push(Line::from(format!(
			"{:<19} {:>9} {:>9} {:>9}",
			format!("{} - {}", row.start.format("%b %d"), row.end.format("%b %d")),
			format_hours_cell(row.totals.worked),
			format_hours_cell(adjusted),
			format_hours_cell(row.totals.total()),
		)));
	}
	lines.push(Line::from(""));
	let adjusted = month.totals.total() - month.totals.worked;
	lines.push(Line::from(Span::styled(
		format!(
			"{:<19} {:>9} {:>9} {:>9}",
			"TOTAL",
			format_hours_cell(month.totals.worked),
			format_hours_cell(adjusted),
			format_hours_cell(month.totals.total()),
		),
		Style::default().add_modifier(Modifier::BOLD),
	)));
	lines.push(Line::from(Span::styled(
		format!("{:<19} {:>9}", "Target", format_hours_cell(month.target)),
		Style::default().fg(Color::DarkGray),
	)));
	if app.show_money {
		lines.extend(money_lines(&app.config, month.totals.worked));
	}

	let paragraph = Paragraph::new(lines).block(
		Block::default()
			.borders(Borders::ALL)
			.title(month.label.clone())
			.border_style(border_style(matches!(app.mode, InputMode::Normal))),
	);
	frame.render_widget(paragraph, area);
}

fn render_year_view(frame: &mut Frame, area: Rect, app: &App, year: &YearView) {
	let mut lines = vec![Line::from(Span::styled(
		format!(
			"{:<10} {:>9} {:>9} {:>9}",
			"Month", "Worked", "Adjusted", "Total"
		),
		Style::default().add_modifier(Modifier::BOLD),
	))];
	for row in &year.rows {
		let adjusted = row.totals.total() - row.totals.worked;
		let text = format!(
			"{:<10} {:>9} {:>9} {:>9}",
			short_month_label(row.year, row.month),
			format_hours_cell(row.totals.worked),
			format_hours_cell(adjusted),
			format_hours_cell(row.totals.total()),
		);
		if row.totals.total().is_zero() {
			lines.push(Line::from(Span::styled(
				text,
				Style::default().add_modifier(Modifier::DIM),
			)));
		} else {
			lines.push(Line::from(text));
		}
	}
	lines.push(Line::from(""));
	let adjusted = year.totals.total() - year.totals.worked;
	lines.push(Line::from(Span::styled(
		format!(
			"{:<10} {:>9} {:>9} {:>9}",
			"TOTAL",
			format_hours_cell(year.totals.worked),
			format_hours_cell(adjusted),
			format_hours_cell(year.totals.total()),
		),
		Style::default().add_modifier(Modifier::BOLD),
	)));
	if app.show_money {
		lines.extend(money_lines(&app.config, year.totals.worked));
	}

	let title = format!(
		"Year {} - {}",
		year.start.format("%b %Y"),
		year.end.format("%b %Y"),
	);
	let paragraph = Paragraph::new(lines).block(
		Block::default()
			.borders(Borders::ALL)
			.title(title)
			.border_style(border_style(matches!(app.mode, InputMode::Normal))),
	);
	frame.render_widget(paragraph, area);
}

fn money_lines(config: &Config, hours: Decimal) -> Vec<Line<'static>> {
	let symbol = config.currency_symbol().to_string();
	let net = config.net_amount(hours);
	let vat = config.vat_amount(net);
	let gross = config.gross_amount(net);
	let vat_label = format!("VAT {:.0}%", config.vat_rate * Decimal::from(100));
	vec![
		Line::from(""),
		Line::from(format!("{:>10}  {symbol}{net:.2}", "Net")),
		Line::from(format!("{vat_label:>10}  {symbol}{vat:.2}")),
		Line::from(Span::styled(
			format!("{:>10}  {symbol}{gross:.2}", "Gross"),
			Style::default().add_modifier(Modifier::BOLD),
		)),
	]
}

fn render_day_view(frame: &mut Frame, area: Rect, app: &App, day: &DayView) {
	let layout = Layout::default()
		.direction(Direction::Vertical)
		.constraints([Constraint::Length(11), Constraint::Min(5)])
		.split(area);

	let title = match day.holiday {
		Some(name) => format!("{} ({})", day.date.format("%A, %d %B %Y"), name),
		None => day.date.format("%A, %d %B %Y").to_string(),
	};
	let entry_panel = Paragraph::new(day_entry_lines(day)).block(
		Block::default()
			.borders(Borders::ALL)
			.title(title)
			.border_style(border_style(matches!(app.mode, InputMode::Normal))),
	);
	frame.render_widget(entry_panel, layout[0]);

	let items: Vec<ListItem> = if day.allocations.is_empty() {
		vec![ListItem::new("(empty)")]
	} else {
		day.allocations
			.iter()
			.map(|(allocation, description)| {
				ListItem::new(allocation_line(allocation, description, false))
			})
			.collect()
	};
	let title = format!(
		"Allocations ({}h / {}h)",
		format_g(day.allocated),
		format_g(day.entry.worked_hours()),
	);
	let list = List::new(items)
		.block(Block::default().borders(Borders::ALL).title(title))
		.highlight_style(
			Style::default()
				.bg(HIGHLIGHT_BACKGROUND_COLOR)
				.add_modifier(Modifier::BOLD),
		);
	let mut state = ListState::default();
	if !day.allocations.is_empty() {
		state.select(Some(app.day_index.min(day.allocations.len() - 1)));
	}
	frame.render_stateful_widget(list, layout[1], &mut state);
}

fn day_entry_lines(day: &DayView) -> Vec<Line<'static>> {
	let entry = &day.entry;
	let worked = entry.worked_hours();
	vec![
		Line::from(format!("{:>9}  {}", "In", format_clock_cell(entry.clock_in))),
		Line::from(format!(
			"{:>9}  {}",
			"Lunch",
			format_lunch_cell(entry.lunch_minutes),
		)),
		Line::from(format!(
			"{:>9}  {}",
			"Out",
			format_clock_cell(entry.clock_out),
		)),
		Line::from(format!("{:>9}  {}", "Worked", format_hours_cell(worked))),
		Line::from(format!(
			"{:>9}  {}",
			"Adjust",
			format_hours_cell(entry.adjusted_hours()),
		)),
		Line::from(format!(
			"{:>9}  {}",
			"Type",
			entry.adjust_type.map(AdjustType::label).unwrap_or("-"),
		)),
		Line::from(format!(
			"{:>9}  {}",
			"Comment",
			entry.comment.clone().unwrap_or_else(|| "-".to_string()),
		)),
		Line::from(""),
		Line::from(format!(
			"{:>9}  {} {}h allocated of {}h ({})",
			"Tickets",
			day.status.marker(),
			format_g(day.allocated),
			format_g(worked),
			status_label(day.status),
		)),
	]
}

fn status_label(status: AllocationStatus) -> &'static str {
	match status {
		AllocationStatus::NoWork => "no work recorded",
		AllocationStatus::Unallocated => "unallocated",
		AllocationStatus::Under => "under-allocated",
		AllocationStatus::Over => "over-allocated",
		AllocationStatus::Exact => "fully allocated",
	}
}

fn render_allocations_view(frame: &mut Frame, area: Rect, app: &App, allocations: &AllocationsView) {
	let mut items = vec![ListItem::new(Line::from(Span::styled(
		format!(
			"{:<8} {:<10} {:>7} {:^6} {}",
			"Date", "Ticket", "Hours", "Client", "Description"
		),
		Style::default().add_modifier(Modifier::BOLD),
	)))];
	if allocations.rows.is_empty() {
		items.push(ListItem::new("(empty)"));
	} else {
		for (allocation, description) in &allocations.rows {
			items.push(ListItem::new(allocation_line(allocation, description, true)));
		}
	}

	let title = format!(
		"Allocations: {} ({}h)",
		allocations.label,
		format_g(allocations.total),
	);
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(title)
				.border_style(border_style(matches!(app.mode, InputMode::Normal))),
		)
		.highlight_style(
			Style::default()
				.bg(HIGHLIGHT_BACKGROUND_COLOR)
				.add_modifier(Modifier::BOLD),
		);
	let mut state = ListState::default();
	if !allocations.rows.is_empty() {
		state.select(Some(
			app.allocations_index.min(allocations.rows.len() - 1) + 1,
		));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn allocation_line(
	allocation: &TicketAllocation,
	description: &str,
	with_date: bool,
) -> Line<'static> {
	let entered = if allocation.entered_on_client {
		"[x]"
	} else {
		"[ ]"
	};
	let hours = format!("{}h", format_g(allocation.hours));
	let text = if with_date {
		format!(
			"{:<8} {:<10} {hours:>7} {entered:^6} {description}",
			allocation.date.format("%b %d").to_string(),
			allocation.ticket_id,
		)
	} else {
		format!(
			"{:<10} {hours:>7} {entered:^6} {description}",
			allocation.ticket_id,
		)
	};
	Line::from(text)
}

fn render_tickets_view(frame: &mut Frame, area: Rect, app: &App, tickets: &TicketsView) {
	let search_style = if app.ticket_search_active {
		Style::default().fg(Color::Yellow)
	} else {
		Style::default().fg(Color::DarkGray)
	};
	let cursor = if app.ticket_search_active { "_" } else { "" };
	let mut items = vec![
		ListItem::new(Line::from(Span::styled(
			format!("Search: {}{cursor}", app.ticket_search),
			search_style,
		))),
		ListItem::new(Line::from(Span::styled(
			format!("{:<10} {:<42} {}", "Id", "Description", "Status"),
			Style::default().add_modifier(Modifier::BOLD),
		))),
	];
	if tickets.rows.is_empty() {
		items.push(ListItem::new("(empty)"));
	} else {
		for ticket in &tickets.rows {
			let text = format!(
				"{:<10} {:<42.42} {}",
				ticket.id,
				ticket.description,
				if ticket.archived { "Archived" } else { "Active" },
			);
			let line = if ticket.archived {
				Line::from(Span::styled(
					text,
					Style::default().add_modifier(Modifier::DIM),
				))
			} else {
				Line::from(text)
			};
			items.push(ListItem::new(line));
		}
	}

	let title = if app.show_archived {
		"Tickets (including archived)"
	} else {
		"Tickets"
	};
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(title)
				.border_style(border_style(matches!(app.mode, InputMode::Normal))),
		)
		.highlight_style(
			Style::default()
				.bg(HIGHLIGHT_BACKGROUND_COLOR)
				.add_modifier(Modifier::BOLD),
		);
	let mut state = ListState::default();
	if !tickets.rows.is_empty() {
		state.select(Some(app.ticket_index.min(tickets.rows.len() - 1) + 2));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
	let mut footer_lines = Vec::new();
	match &app.mode {
		InputMode::Normal => {
			for hint in view_hints(app.view) {
				footer_lines.push(Line::from(Span::styled(
					hint,
					Style::default().fg(Color::DarkGray),
				)));
			}
		}
		InputMode::Form(form) => {
			footer_lines.push(Line::from(Span::styled(
				format!("{}: Enter next/save, ↑/↓ field, Esc cancel", form.title),
				Style::default().fg(Color::DarkGray),
			)));
		}
		InputMode::Select(select) => {
			footer_lines.push(Line::from(Span::styled(
				format!("{}: ↑/↓ choose, Enter confirm, Esc cancel", select.title),
				Style::default().fg(Color::DarkGray),
			)));
		}
	}
	footer_lines.push(Line::from(app.status.clone()));

	let footer = Paragraph::new(footer_lines)
		.block(Block::default().borders(Borders::ALL).title("Shortcuts"));
	frame.render_widget(footer, area);
}

fn view_hints(view: ViewMode) -> [&'static str; 2] {
	match view {
		ViewMode::Week => [
			"←/→ week  ↑/↓ day  Enter/e edit  L/S/T quick adjust  a allocate  x/c/v cut/copy/paste",
			"Tab view  m month  t today  h holidays  q quit",
		],
		ViewMode::Month => [
			"←/→ month  m pick month  h holidays  $ money  t today",
			"Tab view  q quit",
		],
		ViewMode::Year => ["←/→ year  $ money  t today", "Tab view  q quit"],
		ViewMode::Day => [
			"←/→ day  ↑/↓ allocation  a add  Enter edit hours  d delete  Space client flag",
			"Tab view  e edit entry  t today  q quit",
		],
		ViewMode::Allocations => [
			"←/→ month  ↑/↓ row  Enter edit hours  d delete  Space client flag",
			"Tab view  t today  q quit",
		],
		ViewMode::Tickets => [
			"↑/↓ ticket  n new  e edit  a archive  d delete  / search  x archived",
			"Tab view  q quit",
		],
	}
}

fn render_form_popup(frame: &mut Frame, form: &FormState) {
	let area = centered_rect(60, 55, frame.area());
	frame.render_widget(Clear, area);

	let mut lines = Vec::new();
	for (index, field) in form.fields.iter().enumerate() {
		let active = index == form.active;
		let value = if active {
			format!("{}_", field.input)
		} else {
			field.input.clone()
		};
		let value_style = if active {
			Style::default()
				.fg(Color::Yellow)
				.add_modifier(Modifier::BOLD)
		} else {
			Style::default()
		};
		lines.push(Line::from(vec![
			Span::styled(
				format!("{:>14}: ", field.label),
				Style::default().fg(Color::DarkGray),
			),
			Span::styled(value, value_style),
		]));
	}
	if !form.notes.is_empty() {
		lines.push(Line::from(""));
		for note in &form.notes {
			lines.push(Line::from(Span::styled(
				note.clone(),
				Style::default().fg(Color::DarkGray),
			)));
		}
	}

	let paragraph = Paragraph::new(lines).block(
		Block::default()
			.borders(Borders::ALL)
			.title(form.title.clone())
			.border_style(border_style(true)),
	);
	frame.render_widget(paragraph, area);
}

fn render_select_popup(frame: &mut Frame, select: &SelectState) {
	let area = centered_rect(62, 55, frame.area());
	frame.render_widget(Clear, area);

	let items: Vec<ListItem> = select
		.options
		.iter()
		.map(|option| ListItem::new(Line::from(Span::styled(option.label.clone(), option.style))))
		.collect();
	let title = format!(
		"{} ({}/{})",
		select.title,
		select.selected + 1,
		select.options.len().max(1),
	);
	let list = List::new(items)
		.block(
			Block::default()
				.borders(Borders::ALL)
				.title(title)
				.border_style(border_style(true)),
		)
		.highlight_style(
			Style::default()
				.bg(HIGHLIGHT_BACKGROUND_COLOR)
				.add_modifier(Modifier::BOLD),
		)
		.highlight_symbol(">> ");
	let mut state = ListState::default();
	if !select.options.is_empty() {
		state.select(Some(select.selected.min(select.options.len() - 1)));
	}
	frame.render_stateful_widget(list, area, &mut state);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
	let vertical = Layout::default()
		.direction(Direction::Vertical)
		.constraints([
			Constraint::Percentage((100 - percent_y) / 2),
			Constraint::Percentage(percent_y),
			Constraint::Percentage((100 - percent_y) / 2),
		])
		.split(area);
	let horizontal = Layout::default()
		.direction(Direction::Horizontal)
		.constraints([
			Constraint::Percentage((100 - percent_x) / 2),
			Constraint::Percentage(percent_x),
			Constraint::Percentage((100 - percent_x) / 2),
		])
		.split(vertical[1]);
	horizontal[1]
}

fn handle_normal_key(app: &mut App, code: KeyCode, store: &Store, view: &ViewModel) -> bool {
	if app.ticket_search_active {
		handle_search_key(app, code);
		return false;
	}
	let Some(command) = Command::for_key(code, app.view) else {
		return false;
	};
	run_command(app, store, view, command)
}

fn handle_search_key(app: &mut App, code: KeyCode) {
	match code {
		KeyCode::Esc | KeyCode::Enter => {
			app.ticket_search_active = false;
			app.status = if app.ticket_search.is_empty() {
				"search cleared".to_string()
			} else {
				format!("filtering tickets by \"{}\"", app.ticket_search)
			};
		}
		KeyCode::Backspace => {
			app.ticket_search.pop();
			app.ticket_index = 0;
		}
		KeyCode::Char(value) => {
			app.ticket_search.push(value);
			app.ticket_index = 0;
		}
		_ => {}
	}
}

fn run_command(app: &mut App, store: &Store, view: &ViewModel, command: Command) -> bool {
	match command {
		Command::Quit => return true,
		Command::Back => {
			if app.view == ViewMode::Week {
				return true;
			}
			app.view = ViewMode::Week;
		}
		Command::NextView => app.view = app.view.next(),
		Command::PrevView => app.view = app.view.prev(),
		Command::PrevUnit => {
			if let Err(err) = app.shift_unit(store, -1) {
				app.status = format!("error: {err}");
			}
		}
		Command::NextUnit => {
			if let Err(err) = app.shift_unit(store, 1) {
				app.status = format!("error: {err}");
			}
		}
		Command::CursorUp => app.move_cursor(view, -1),
		Command::CursorDown => app.move_cursor(view, 1),
		Command::Today => match app.goto_today(store) {
			Ok(()) => app.status = format!("jumped to {}", app.today.format("%b %d")),
			Err(err) => app.status = format!("error: {err}"),
		},
		Command::PickMonth => app.mode = InputMode::Select(build_month_select(app)),
		Command::ToggleMoney => {
			app.show_money = !app.show_money;
			app.status = if app.show_money {
				"money shown".to_string()
			} else {
				"money hidden".to_string()
			};
		}
		Command::EditDay => {
			app.mode = InputMode::Form(build_day_form(app, app.selected_date()));
		}
		Command::PopulateHolidays => match populate_holidays_now(app, store) {
			Ok(message) => app.status = message,
			Err(err) => app.status = format!("error: {err}"),
		},
		Command::QuickAdjust(adjust) => {
			let date = app.selected_date();
			let blank = app.entries.get(&date).map_or(true, TimeEntry::is_blank);
			if blank {
				match apply_quick_adjust(app, store, date, adjust) {
					Ok(message) => app.status = message,
					Err(err) => app.status = format!("error: {err}"),
				}
			} else {
				app.mode = InputMode::Select(build_quick_adjust_confirm(date, adjust));
			}
		}
		Command::CutDay => match cut_day(app, store) {
			Ok(message) => app.status = message,
			Err(err) => app.status = format!("error: {err}"),
		},
		Command::CopyDay => app.status = copy_day(app),
		Command::PasteDay => match paste_day(app, store) {
			Ok(message) => app.status = message,
			Err(err) => app.status = format!("error: {err}"),
		},
		Command::AddAllocation => match build_ticket_select(store, app.selected_date()) {
			Ok(select) => app.mode = InputMode::Select(select),
			Err(err) => app.status = format!("error: {err}"),
		},
		Command::EditAllocation => match selected_allocation(app, view) {
			Some((allocation, _)) => {
				let result = store
					.ticket(&allocation.ticket_id)
					.map_err(|err| err.to_string())
					.and_then(|ticket| {
						ticket.ok_or_else(|| format!("ticket {} not found", allocation.ticket_id))
					})
					.and_then(|ticket| build_allocation_form(app, store, &ticket, allocation.date));
				match result {
					Ok(form) => app.mode = InputMode::Form(form),
					Err(err) => app.status = format!("error: {err}"),
				}
			}
			None => app.status = "no allocation selected".to_string(),
		},
		Command::DeleteAllocation => match selected_allocation(app, view) {
			Some((allocation, _)) => {
				app.mode = InputMode::Select(build_delete_allocation_confirm(
					&allocation.ticket_id,
					allocation.date,
				));
			}
			None => app.status = "no allocation selected".to_string(),
		},
		Command::ToggleEntered => match selected_allocation(app, view) {
			Some((allocation, _)) => match toggle_entered(app, store, &allocation) {
				Ok(message) => app.status = message,
				Err(err) => app.status = format!("error: {err}"),
			},
			None => app.status = "no allocation selected".to_string(),
		},
		Command::NewTicket => app.mode = InputMode::Form(build_new_ticket_form(None)),
		Command::EditTicket => match selected_ticket(app, view) {
			Some(ticket) => app.mode = InputMode::Form(build_edit_ticket_form(&ticket)),
			None => app.status = "no ticket selected".to_string(),
		},
		Command::ToggleArchiveTicket => match selected_ticket(app, view) {
			Some(ticket) => match toggle_ticket_archived(store, &ticket) {
				Ok(message) => app.status = message,
				Err(err) => app.status = format!("error: {err}"),
			},
			None => app.status = "no ticket selected".to_string(),
		},
		Command::DeleteTicket => match selected_ticket(app, view) {
			Some(ticket) => match store.can_delete_ticket(&ticket.id) {
				Ok(true) => {
					app.mode = InputMode::Select(build_delete_ticket_confirm(&ticket.id));
				}
				Ok(false) => {
					app.status = format!("cannot delete {}: has time allocations", ticket.id);
				}
				Err(err) => app.status = format!("error: {err}"),
			},
			None => app.status = "no ticket selected".to_string(),
		},
		Command::SearchTickets => {
			app.ticket_search_active = true;
			app.status = "type to filter tickets".to_string();
		}
		Command::ToggleShowArchived => {
			app.show_archived = !app.show_archived;
			app.ticket_index = 0;
			app.status = if app.show_archived {
				"showing archived tickets".to_string()
			} else {
				"hiding archived tickets".to_string()
			};
		}
	}
	false
}

fn handle_form_key(app: &mut App, code: KeyCode, store: &Store) -> bool {
	let InputMode::Form(form) = &mut app.mode else {
		return false;
	};
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Input cancelled".to_string();
		}
		KeyCode::Backspace => {
			if let Some(field) = form.fields.get_mut(form.active) {
				field.input.pop();
			}
		}
		KeyCode::Up => form.active = form.active.saturating_sub(1),
		KeyCode::Down | KeyCode::Tab => {
			form.active = (form.active + 1).min(form.fields.len().saturating_sub(1));
		}
		KeyCode::Char(value) => insert_form_char(form, value),
		KeyCode::Enter => {
			if form.active + 1 < form.fields.len() {
				form.active += 1;
			} else {
				let form = match std::mem::replace(&mut app.mode, InputMode::Normal) {
					InputMode::Form(form) => form,
					_ => return false,
				};
				match submit_form(form.clone(), app, store) {
					Ok(FormOutcome::NextForm(next)) => app.mode = InputMode::Form(next),
					Ok(FormOutcome::Done(message)) => app.status = message,
					Err(err) => {
						app.mode = InputMode::Form(form);
						app.status = format!("error: {err}");
					}
				}
			}
		}
		_ => {}
	}
	false
}

fn insert_form_char(form: &mut FormState, value: char) {
	match (&form.kind, form.active) {
		(FormKind::EditDay { .. }, DAY_FIELD_TYPE) => {
			let code = value.to_ascii_uppercase();
			if let Some(field) = form.fields.get_mut(DAY_FIELD_TYPE) {
				field.input = code.to_string();
			}
			if matches!(code, 'L' | 'S' | 'T' | 'P') {
				form.active = DAY_FIELD_COMMENT;
			}
		}
		(FormKind::NewTicket { .. }, 0) => {
			if let Some(field) = form.fields.get_mut(0) {
				if field.input.chars().count() < 8 {
					field.input.push(value.to_ascii_uppercase());
				}
			}
		}
		_ => {
			if let Some(field) = form.fields.get_mut(form.active) {
				field.input.push(value);
			}
		}
	}
}

fn handle_select_key(app: &mut App, code: KeyCode, store: &Store) -> bool {
	let InputMode::Select(select) = &mut app.mode else {
		return false;
	};
	match code {
		KeyCode::Esc => {
			app.mode = InputMode::Normal;
			app.status = "Selection cancelled".to_string();
		}
		KeyCode::Up | KeyCode::Char('k') => select.move_selection(-1),
		KeyCode::Down | KeyCode::Char('j') => select.move_selection(1),
		KeyCode::Char('n') => {
			if let SelectKind::TicketPick { date } = select.kind {
				app.mode = InputMode::Form(build_new_ticket_form(Some(date)));
			}
		}
		KeyCode::Enter => {
			let select = match std::mem::replace(&mut app.mode, InputMode::Normal) {
				InputMode::Select(select) => select,
				_ => return false,
			};
			match submit_select(select.clone(), app, store) {
				Ok(SelectOutcome::NextForm(form)) => app.mode = InputMode::Form(form),
				Ok(SelectOutcome::Done(message)) => app.status = message,
				Err(err) => {
					app.mode = InputMode::Select(select);
					app.status = format!("error: {err}");
				}
			}
		}
		_ => {}
	}
	false
}

fn submit_form(form: FormState, app: &mut App, store: &Store) -> Result<FormOutcome, String> {
	match form.kind.clone() {
		FormKind::EditDay { date } => submit_day_form(&form, app, store, date),
		FormKind::NewTicket { allocate_for } => submit_new_ticket(&form, app, store, allocate_for),
		FormKind::EditTicket { id } => submit_edit_ticket(&form, store, &id),
		FormKind::AllocationHours { ticket_id, date } => {
			submit_allocation(&form, app, store, &ticket_id, date)
		}
	}
}

fn submit_day_form(
	form: &FormState,
	app: &mut App,
	store: &Store,
	date: NaiveDate,
) -> Result<FormOutcome, String> {
	let clock_in = parse_clock_field(form.value(DAY_FIELD_CLOCK_IN), "clock-in")?;
	let lunch = parse_minutes_field(form.value(DAY_FIELD_LUNCH))?;
	let clock_out = parse_clock_field(form.value(DAY_FIELD_CLOCK_OUT), "clock-out")?;
	let adjustment = parse_adjust_hours_field(form.value(DAY_FIELD_ADJUSTMENT))?;
	let adjust_type = parse_adjust_type_field(form.value(DAY_FIELD_TYPE))?;
	if adjustment.is_some() && adjust_type.is_none() {
		return Err("adjustment hours require an adjust type".to_string());
	}

	let mut entry = TimeEntry::blank(date);
	entry.clock_in = clock_in;
	entry.lunch_minutes = lunch;
	entry.clock_out = clock_out;
	entry.adjustment_minutes = adjustment;
	entry.adjust_type = adjust_type;
	entry.comment = optional_text(form.value(DAY_FIELD_COMMENT));
	store.save_entry(&entry).map_err(|err| err.to_string())?;
	app.reload(store).map_err(|err| err.to_string())?;
	Ok(FormOutcome::Done(format!("saved {}", date.format("%b %d"))))
}

fn submit_new_ticket(
	form: &FormState,
	app: &mut App,
	store: &Store,
	allocate_for: Option<NaiveDate>,
) -> Result<FormOutcome, String> {
	let id = required_text(form.value(0), "ticket id")?.to_uppercase();
	if id.chars().count() > 8 {
		return Err("ticket id must be 8 characters or less".to_string());
	}
	let description = required_text(form.value(1), "description")?;
	if store.ticket(&id).map_err(|err| err.to_string())?.is_some() {
		return Err(format!("ticket {id} already exists"));
	}

	let ticket = Ticket {
		id: id.clone(),
		description,
		archived: false,
		created_at: app.today,
	};
	store.save_ticket(&ticket).map_err(|err| err.to_string())?;
	match allocate_for {
		Some(date) => Ok(FormOutcome::NextForm(build_allocation_form(
			app, store, &ticket, date,
		)?)),
		None => Ok(FormOutcome::Done(format!("created ticket {id}"))),
	}
}

fn submit_edit_ticket(form: &FormState, store: &Store, id: &str) -> Result<FormOutcome, String> {
	let description = required_text(form.value(0), "description")?;
	let mut ticket = store
		.ticket(id)
		.map_err(|err| err.to_string())?
		.ok_or_else(|| format!("ticket {id} not found"))?;
	ticket.description = description;
	store.save_ticket(&ticket).map_err(|err| err.to_string())?;
	Ok(FormOutcome::Done(format!("saved ticket {id}")))
}

fn submit_allocation(
	form: &FormState,
	app: &mut App,
	store: &Store,
	ticket_id: &str,
	date: NaiveDate,
) -> Result<FormOutcome, String> {
	let text = required_text(form.value(0), "hours")?;
	let hours: Decimal = text.parse().map_err(|_| "invalid hours value".to_string())?;
	if hours < Decimal::ZERO {
		return Err("hours must be positive".to_string());
	}
	store
		.save_allocation(ticket_id, date, hours)
		.map_err(|err| err.to_string())?;
	app.reload(store).map_err(|err| err.to_string())?;
	if hours.is_zero() {
		Ok(FormOutcome::Done(format!("removed allocation {ticket_id}")))
	} else {
		Ok(FormOutcome::Done(format!(
			"allocated {}h to {ticket_id}",
			format_g(hours),
		)))
	}
}

fn submit_select(
	select: SelectState,
	app: &mut App,
	store: &Store,
) -> Result<SelectOutcome, String> {
	let value = select
		.selected_option()
		.map(|option| option.value.clone())
		.ok_or_else(|| "no option selected".to_string())?;
	match select.kind.clone() {
		SelectKind::MonthPick => {
			let value = value.ok_or_else(|| "no option selected".to_string())?;
			let (year, month) = parse_month_value(&value)?;
			app.set_month(store, year, month)
				.map_err(|err| err.to_string())?;
			Ok(SelectOutcome::Done(format!(
				"showing {}",
				month_label(year, month),
			)))
		}
		SelectKind::TicketPick { date } => match value {
			Some(id) => {
				let ticket = store
					.ticket(&id)
					.map_err(|err| err.to_string())?
					.ok_or_else(|| format!("ticket {id} not found"))?;
				Ok(SelectOutcome::NextForm(build_allocation_form(
					app, store, &ticket, date,
				)?))
			}
			None => Ok(SelectOutcome::NextForm(build_new_ticket_form(Some(date)))),
		},
		SelectKind::ConfirmQuickAdjust { date, adjust } => {
			if value.as_deref() == Some("apply") {
				apply_quick_adjust(app, store, date, adjust)
					.map(SelectOutcome::Done)
					.map_err(|err| err.to_string())
			} else {
				Ok(SelectOutcome::Done("adjust cancelled".to_string()))
			}
		}
		SelectKind::ConfirmDeleteAllocation { ticket_id, date } => {
			if value.as_deref() == Some("delete") {
				store
					.delete_allocation(&ticket_id, date)
					.map_err(|err| err.to_string())?;
				app.reload(store).map_err(|err| err.to_string())?;
				Ok(SelectOutcome::Done(format!("removed allocation {ticket_id}")))
			} else {
				Ok(SelectOutcome::Done("Delete cancelled".to_string()))
			}
		}
		SelectKind::ConfirmDeleteTicket { id } => {
			if value.as_deref() == Some("delete") {
				let deleted = store.delete_ticket(&id).map_err(|err| err.to_string())?;
				app.ticket_index = 0;
				if deleted {
					Ok(SelectOutcome::Done(format!("deleted ticket {id}")))
				} else {
					Ok(SelectOutcome::Done(format!(
						"cannot delete {id}: has time allocations",
					)))
				}
			} else {
				Ok(SelectOutcome::Done("Delete cancelled".to_string()))
			}
		}
	}
}

fn build_day_form(app: &App, date: NaiveDate) -> FormState {
	let entry = app
		.entries
		.get(&date)
		.cloned()
		.unwrap_or_else(|| TimeEntry::blank(date));
	let adjustment = entry
		.adjustment_minutes
		.map(|minutes| format_g(hours_from_minutes(minutes)))
		.unwrap_or_default();
	let fields = vec![
		(
			"In (HH:MM)",
			entry
				.clock_in
				.map(|time| time.format("%H:%M").to_string())
				.unwrap_or_default(),
		),
		(
			"Lunch (m)",
			entry
				.lunch_minutes
				.map(|minutes| minutes.to_string())
				.unwrap_or_default(),
		),
		(
			"Out (HH:MM)",
			entry
				.clock_out
				.map(|time| time.format("%H:%M").to_string())
				.unwrap_or_default(),
		),
		("Adjust (h)", adjustment),
		(
			"Type (L/S/T/P)",
			entry
				.adjust_type
				.map(|adjust| adjust.code().to_string())
				.unwrap_or_default(),
		),
		("Comment", entry.comment.clone().unwrap_or_default()),
	];
	FormState::new(
		format!("Edit {} {}", entry.day_of_week, date.format("%b %d, %Y")),
		FormKind::EditDay { date },
		fields,
	)
}

fn build_new_ticket_form(allocate_for: Option<NaiveDate>) -> FormState {
	FormState::new(
		"New Ticket",
		FormKind::NewTicket { allocate_for },
		vec![("Id", String::new()), ("Description", String::new())],
	)
}

fn build_edit_ticket_form(ticket: &Ticket) -> FormState {
	FormState::new(
		format!("Edit Ticket {}", ticket.id),
		FormKind::EditTicket {
			id: ticket.id.clone(),
		},
		vec![("Description", ticket.description.clone())],
	)
}

fn build_allocation_form(
	app: &App,
	store: &Store,
	ticket: &Ticket,
	date: NaiveDate,
) -> Result<FormState, String> {
	let worked = app
		.entries
		.get(&date)
		.map(TimeEntry::worked_hours)
		.unwrap_or(Decimal::ZERO);
	let allocations = store
		.allocations_for_date(date)
		.map_err(|err| err.to_string())?;
	let mut others = Decimal::ZERO;
	let mut current = Decimal::ZERO;
	for (allocation, _) in &allocations {
		if allocation.ticket_id == ticket.id {
			current = allocation.hours;
		} else {
			others += allocation.hours;
		}
	}
	let remaining = worked - others;

	let mut form = FormState::new(
		format!("Allocate {} on {}", ticket.id, date.format("%b %d")),
		FormKind::AllocationHours {
			ticket_id: ticket.id.clone(),
			date,
		},
		vec![(
			"Hours",
			if current.is_zero() {
				String::new()
			} else {
				format_g(current)
			},
		)],
	);
	form.notes = vec![
		format!("{}: {}", ticket.id, ticket.description),
		format!("Remaining to allocate: {}h", format_g(remaining)),
	];
	Ok(form)
}

fn build_ticket_select(store: &Store, date: NaiveDate) -> Result<SelectState, String> {
	let tickets = store.tickets(false).map_err(|err| err.to_string())?;
	let mut options: Vec<SelectOption> = tickets
		.iter()
		.map(|ticket| {
			SelectOption::new(
				format!("{:<10} {}", ticket.id, ticket.description),
				Some(ticket.id.clone()),
				Style::default(),
			)
		})
		.collect();
	options.push(SelectOption::new(
		"+ New ticket (n)",
		None,
		Style::default().fg(Color::LightGreen),
	));
	Ok(SelectState::new(
		format!("Allocate {} to", date.format("%b %d")),
		SelectKind::TicketPick { date },
		options,
	))
}

fn build_month_select(app: &App) -> SelectState {
	let mut options = Vec::new();
	for delta in -12..=12 {
		let (year, month) = shift_month(app.anchor_year, app.anchor_month, delta);
		let style = if delta == 0 {
			Style::default().add_modifier(Modifier::BOLD)
		} else {
			Style::default()
		};
		options.push(SelectOption::new(
			month_label(year, month),
			Some(format!("{year}-{month:02}")),
			style,
		));
	}
	let mut select = SelectState::new("Select month", SelectKind::MonthPick, options);
	select.selected = 12;
	select
}

fn build_quick_adjust_confirm(date: NaiveDate, adjust: AdjustType) -> SelectState {
	let mut select = SelectState::new(
		format!("Overwrite existing entry for {}?", date.format("%b %d")),
		SelectKind::ConfirmQuickAdjust { date, adjust },
		vec![
			SelectOption::new(
				format!("Overwrite with {}", adjust.label()),
				Some("apply".to_string()),
				Style::default()
					.fg(Color::LightRed)
					.add_modifier(Modifier::BOLD),
			),
			SelectOption::new("Cancel", None, Style::default()),
		],
	);
	// Confirm popups default to Cancel.
	select.selected = 1;
	select
}

fn build_delete_allocation_confirm(ticket_id: &str, date: NaiveDate) -> SelectState {
	let mut select = SelectState::new(
		format!("Delete allocation {} on {}?", ticket_id, date.format("%b %d")),
		SelectKind::ConfirmDeleteAllocation {
			ticket_id: ticket_id.to_string(),
			date,
		},
		vec![
			SelectOption::new(
				"Delete",
				Some("delete".to_string()),
				Style::default()
					.fg(Color::LightRed)
					.add_modifier(Modifier::BOLD),
			),
			SelectOption::new("Cancel", None, Style::default()),
		],
	);
	select.selected = 1;
	select
}

fn build_delete_ticket_confirm(id: &str) -> SelectState {
	let mut select = SelectState::new(
		format!("Delete ticket {id}?"),
		SelectKind::ConfirmDeleteTicket { id: id.to_string() },
		vec![
			SelectOption::new(
				"Delete",
				Some("delete".to_string()),
				Style::default()
					.fg(Color::LightRed)
					.add_modifier(Modifier::BOLD),
			),
			SelectOption::new("Cancel", None, Style::default()),
		],
	);
	select.selected = 1;
	select
}

fn build_view(app: &App, store: &Store) -> Result<ViewModel, StorageError> {
	let week = build_week_view(app);
	let body = match app.view {
		ViewMode::Week => BodyView::Week,
		ViewMode::Month => BodyView::Month(build_month_view(app)),
		ViewMode::Year => BodyView::Year(build_year_view(app, store)?),
		ViewMode::Day => BodyView::Day(build_day_view(app, store)?),
		ViewMode::Allocations => BodyView::Allocations(build_allocations_view(app, store)?),
		ViewMode::Tickets => BodyView::Tickets(build_tickets_view(app, store)?),
	};
	Ok(ViewModel { week, body })
}

fn build_week_view(app: &App) -> WeekView {
	let (start, end) = app
		.weeks
		.get(app.week_index)
		.copied()
		.unwrap_or((app.today, app.today));
	let mut rows = Vec::with_capacity(7);
	for offset in 0..7 {
		let date = start + Duration::days(offset);
		let entry = app
			.entries
			.get(&date)
			.cloned()
			.unwrap_or_else(|| TimeEntry::blank(date));
		rows.push(WeekRow {
			date,
			allocated: app.allocated.get(&date).copied().unwrap_or(Decimal::ZERO),
			outside_month: date.month() != app.anchor_month,
			weekend: entry.is_weekend(),
			entry,
		});
	}
	let totals = WeekTotals::from_entries(rows.iter().map(|row| &row.entry));
	let weekdays = count_weekdays(start, end, None);
	let target = totals.target(weekdays, app.config.standard_day_hours);
	WeekView {
		start,
		end,
		number: app.week_index + 1,
		count: app.weeks.len(),
		month_label: month_label(app.anchor_year, app.anchor_month),
		rows,
		totals,
		target,
	}
}

fn build_month_view(app: &App) -> MonthView {
	let mut rows = Vec::with_capacity(app.weeks.len());
	for &(start, end) in &app.weeks {
		let entries = (0..7)
			.map(|offset| start + Duration::days(offset))
			.filter_map(|date| app.entries.get(&date));
		rows.push(MonthWeekRow {
			start,
			end,
			totals: WeekTotals::from_entries(entries),
		});
	}
	let (span_start, span_end) = app.visible_range();
	let totals = WeekTotals::from_entries(app.entries.values());
	let weekdays = count_weekdays(span_start, span_end, None);
	let target = totals.target(weekdays, app.config.standard_day_hours);
	MonthView {
		label: month_label(app.anchor_year, app.anchor_month),
		rows,
		totals,
		target,
	}
}

fn build_year_view(app: &App, store: &Store) -> Result<YearView, StorageError> {
	let start = company_year_start(first_day_of_month(app.anchor_year, app.anchor_month));
	let months = company_year_months(start);
	let end = months
		.last()
		.map(|&(year, month)| last_day_of_month(year, month))
		.unwrap_or(start);
	let entries = store.entries_between(start, end)?;
	let rows = months
		.iter()
		.map(|&(year, month)| {
			let totals = WeekTotals::from_entries(
				entries
					.iter()
					.filter(|entry| entry.date.year() == year && entry.date.month() == month),
			);
			YearMonthRow { year, month, totals }
		})
		.collect();
	let totals = WeekTotals::from_entries(entries.iter());
	Ok(YearView {
		start,
		end,
		rows,
		totals,
	})
}

fn build_day_view(app: &App, store: &Store) -> Result<DayView, StorageError> {
	let date = app.selected_date();
	let entry = app
		.entries
		.get(&date)
		.cloned()
		.unwrap_or_else(|| TimeEntry::blank(date));
	let allocations = store.allocations_for_date(date)?;
	let allocated = store.allocated_hours(date)?;
	let status = allocation_status(entry.worked_hours(), allocated);
	Ok(DayView {
		date,
		entry,
		holiday: holiday_name(date),
		allocations,
		allocated,
		status,
	})
}

fn build_allocations_view(app: &App, store: &Store) -> Result<AllocationsView, StorageError> {
	let start = first_day_of_month(app.anchor_year, app.anchor_month);
	let end = last_day_of_month(app.anchor_year, app.anchor_month);
	let rows = store.allocations_between(start, end)?;
	let total = rows
		.iter()
		.map(|(allocation, _)| allocation.hours)
		.sum::<Decimal>()
		.round_dp(2);
	Ok(AllocationsView {
		label: month_label(app.anchor_year, app.anchor_month),
		rows,
		total,
	})
}

fn build_tickets_view(app: &App, store: &Store) -> Result<TicketsView, StorageError> {
	let rows = if app.ticket_search.is_empty() {
		store.tickets(app.show_archived)?
	} else {
		store.search_tickets(&app.ticket_search, app.show_archived)?
	};
	Ok(TicketsView { rows })
}

fn selected_allocation(app: &App, view: &ViewModel) -> Option<(TicketAllocation, String)> {
	match &view.body {
		BodyView::Day(day) => day.allocations.get(app.day_index).cloned(),
		BodyView::Allocations(allocations) => {
			allocations.rows.get(app.allocations_index).cloned()
		}
		_ => None,
	}
}

fn selected_ticket(app: &App, view: &ViewModel) -> Option<Ticket> {
	match &view.body {
		BodyView::Tickets(tickets) => tickets.rows.get(app.ticket_index).cloned(),
		_ => None,
	}
}

fn apply_quick_adjust(
	app: &mut App,
	store: &Store,
	date: NaiveDate,
	adjust: AdjustType,
) -> Result<String, StorageError> {
	let mut entry = TimeEntry::blank(date);
	entry.adjustment_minutes = Some(app.config.standard_day_minutes());
	entry.adjust_type = Some(adjust);
	store.save_entry(&entry)?;
	app.reload(store)?;
	if app.day_cursor < 6 {
		app.day_cursor += 1;
	}
	Ok(format!(
		"{} recorded for {}",
		adjust.label(),
		date.format("%b %d"),
	))
}

fn populate_holidays_now(app: &mut App, store: &Store) -> Result<String, StorageError> {
	let added = store.populate_holidays(
		app.anchor_year,
		app.anchor_month,
		app.config.standard_day_minutes(),
	)?;
	app.reload(store)?;
	if added > 0 {
		Ok(format!("added {added} holiday entries"))
	} else {
		Ok("no new holidays to add".to_string())
	}
}

fn toggle_entered(
	app: &mut App,
	store: &Store,
	allocation: &TicketAllocation,
) -> Result<String, StorageError> {
	let entered = !allocation.entered_on_client;
	store.set_entered_on_client(&allocation.ticket_id, allocation.date, entered)?;
	app.reload(store)?;
	if entered {
		Ok(format!("marked {} as entered on client", allocation.ticket_id))
	} else {
		Ok(format!("cleared client flag for {}", allocation.ticket_id))
	}
}

fn toggle_ticket_archived(store: &Store, ticket: &Ticket) -> Result<String, StorageError> {
	let archived = !ticket.archived;
	store.set_ticket_archived(&ticket.id, archived)?;
	if archived {
		Ok(format!("archived {}", ticket.id))
	} else {
		Ok(format!("restored {}", ticket.id))
	}
}

fn copy_day(app: &mut App) -> String {
	let date = app.selected_date();
	let entry = app
		.entries
		.get(&date)
		.cloned()
		.unwrap_or_else(|| TimeEntry::blank(date));
	app.clipboard = Some(entry);
	format!("copied {}", date.format("%b %d"))
}

fn cut_day(app: &mut App, store: &Store) -> Result<String, StorageError> {
	let date = app.selected_date();
	let entry = app
		.entries
		.get(&date)
		.cloned()
		.unwrap_or_else(|| TimeEntry::blank(date));
	store.save_entry(&TimeEntry::blank(date))?;
	app.reload(store)?;
	app.clipboard = Some(entry);
	Ok(format!("cut {}", date.format("%b %d")))
}

fn paste_day(app: &mut App, store: &Store) -> Result<String, StorageError> {
	let date = app.selected_date();
	let Some(clipboard) = app.clipboard.clone() else {
		return Ok("clipboard is empty".to_string());
	};
	let mut entry = clipboard;
	entry.date = date;
	entry.day_of_week = date.format("%a").to_string();
	store.save_entry(&entry)?;
	app.reload(store)?;
	Ok(format!("pasted to {}", date.format("%b %d")))
}

fn parse_clock_field(input: &str, field_name: &str) -> Result<Option<NaiveTime>, String> {
	let text = input.trim();
	if text.is_empty() {
		return Ok(None);
	}
	NaiveTime::parse_from_str(text, "%H:%M")
		.map(Some)
		.map_err(|_| format!("{field_name} must be HH:MM"))
}

fn parse_minutes_field(input: &str) -> Result<Option<i64>, String> {
	let text = input.trim();
	if text.is_empty() {
		return Ok(None);
	}
	let minutes: i64 = text
		.parse()
		.map_err(|_| "lunch must be whole minutes".to_string())?;
	if minutes < 0 {
		return Err("lunch must not be negative".to_string());
	}
	Ok(Some(minutes).filter(|&minutes| minutes != 0))
}

fn parse_adjust_hours_field(input: &str) -> Result<Option<i64>, String> {
	let text = input.trim();
	if text.is_empty() {
		return Ok(None);
	}
	let hours: Decimal = text
		.parse()
		.map_err(|_| "adjust hours must be a number".to_string())?;
	let minutes = minutes_from_hours(hours);
	Ok(Some(minutes).filter(|&minutes| minutes != 0))
}

fn parse_adjust_type_field(input: &str) -> Result<Option<AdjustType>, String> {
	let text = input.trim().to_uppercase();
	if text.is_empty() {
		return Ok(None);
	}
	AdjustType::from_code(&text)
		.map(Some)
		.ok_or_else(|| "adjust type must be L, S, T, or P".to_string())
}

fn parse_month_value(value: &str) -> Result<(i32, u32), String> {
	let (year, month) = value
		.split_once('-')
		.ok_or_else(|| "invalid month value".to_string())?;
	let year: i32 = year.parse().map_err(|_| "invalid month value".to_string())?;
	let month: u32 = month.parse().map_err(|_| "invalid month value".to_string())?;
	Ok((year, month))
}

fn required_text(input: &str, field_name: &str) -> Result<String, String> {
	let text = input.trim();
	if text.is_empty() {
		return Err(format!("{field_name} is required"));
	}
	Ok(text.to_string())
}

fn optional_text(input: &str) -> Option<String> {
	let text = input.trim();
	if text.is_empty() {
		None
	} else {
		Some(text.to_string())
	}
}

fn month_label(year: i32, month: u32) -> String {
	match NaiveDate::from_ymd_opt(year, month, 1) {
		Some(date) => date.format("%B %Y").to_string(),
		None => format!("{year}-{month:02}"),
	}
}

fn short_month_label(year: i32, month: u32) -> String {
	match NaiveDate::from_ymd_opt(year, month, 1) {
		Some(date) => date.format("%b %Y").to_string(),
		None => format!("{year}-{month:02}"),
	}
}

fn format_g(value: Decimal) -> String {
	value.normalize().to_string()
}

fn format_hours_cell(hours: Decimal) -> String {
	if hours.is_zero() {
		"-".to_string()
	} else {
		format!("{}h", format_g(hours))
	}
}

fn format_clock_cell(time: Option<NaiveTime>) -> String {
	match time {
		Some(time) => time.format("%H:%M").to_string(),
		None => "-".to_string(),
	}
}

fn format_lunch_cell(minutes: Option<i64>) -> String {
	match minutes {
		Some(minutes) => format!("{minutes:02}m"),
		None => "-".to_string(),
	}
}

fn format_comment_cell(comment: Option<&str>) -> String {
	match comment {
		Some(text) if text.chars().count() > 20 => {
			let short: String = text.chars().take(20).collect();
			format!("{short}...")
		}
		Some(text) => text.to_string(),
		None => String::new(),
	}
}

fn border_style(focused: bool) -> Style {
	if focused {
		Style::default().fg(FOCUSED_PANEL_BORDER_COLOR)
	} else {
		Style::default().fg(INACTIVE_PANEL_BORDER_COLOR)
	}
}

fn step(current: usize, delta: i32, len: usize) -> usize {
	if len == 0 {
		return 0;
	}
	if delta >= 0 {
		(current + delta as usize).min(len - 1)
	} else {
		current.saturating_sub(delta.unsigned_abs() as usize)
	}
}

fn clamp_index(index: usize, len: usize) -> usize {
	if len == 0 {
		0
	} else {
		index.min(len - 1)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
	Quit,
	Back,
	NextView,
	PrevView,
	PrevUnit,
	NextUnit,
	CursorUp,
	CursorDown,
	Today,
	PickMonth,
	ToggleMoney,
	EditDay,
	PopulateHolidays,
	QuickAdjust(AdjustType),
	CutDay,
	CopyDay,
	PasteDay,
	AddAllocation,
	EditAllocation,
	DeleteAllocation,
	ToggleEntered,
	NewTicket,
	EditTicket,
	ToggleArchiveTicket,
	DeleteTicket,
	SearchTickets,
	ToggleShowArchived,
}

const KEY_BINDINGS: &[(KeyCode, Command)] = &[
	(KeyCode::Char('q'), Command::Quit),
	(KeyCode::Esc, Command::Back),
	(KeyCode::Tab, Command::NextView),
	(KeyCode::BackTab, Command::PrevView),
	(KeyCode::Left, Command::PrevUnit),
	(KeyCode::Right, Command::NextUnit),
	(KeyCode::Up, Command::CursorUp),
	(KeyCode::Char('k'), Command::CursorUp),
	(KeyCode::Down, Command::CursorDown),
	(KeyCode::Char('j'), Command::CursorDown),
	(KeyCode::Char('t'), Command::Today),
	(KeyCode::Char('m'), Command::PickMonth),
	(KeyCode::Char('$'), Command::ToggleMoney),
	(KeyCode::Enter, Command::EditAllocation),
	(KeyCode::Enter, Command::EditDay),
	(KeyCode::Char('e'), Command::EditTicket),
	(KeyCode::Char('e'), Command::EditDay),
	(KeyCode::Char('h'), Command::PopulateHolidays),
	(KeyCode::Char('L'), Command::QuickAdjust(AdjustType::Leave)),
	(KeyCode::Char('S'), Command::QuickAdjust(AdjustType::Sick)),
	(KeyCode::Char('T'), Command::QuickAdjust(AdjustType::Training)),
	(KeyCode::Char('x'), Command::ToggleShowArchived),
	(KeyCode::Char('x'), Command::CutDay),
	(KeyCode::Char('c'), Command::CopyDay),
	(KeyCode::Char('v'), Command::PasteDay),
	(KeyCode::Char('a'), Command::ToggleArchiveTicket),
	(KeyCode::Char('a'), Command::AddAllocation),
	(KeyCode::Char('d'), Command::DeleteAllocation),
	(KeyCode::Char('d'), Command::DeleteTicket),
	(KeyCode::Char('n'), Command::NewTicket),
	(KeyCode::Char('/'), Command::SearchTickets),
	(KeyCode::Char(' '), Command::ToggleEntered),
];

impl Command {
	fn for_key(code: KeyCode, view: ViewMode) -> Option<Command> {
		KEY_BINDINGS
			.iter()
			.find(|(key, command)| *key == code && command.applies(view))
			.map(|&(_, command)| command)
	}

	fn applies(self, view: ViewMode) -> bool {
		match self {
			Command::Quit | Command::Back | Command::NextView | Command::PrevView => true,
			Command::PrevUnit | Command::NextUnit | Command::Today | Command::PickMonth => {
				view != ViewMode::Tickets
			}
			Command::CursorUp | Command::CursorDown => matches!(
				view,
				ViewMode::Week | ViewMode::Day | ViewMode::Allocations | ViewMode::Tickets,
			),
			Command::ToggleMoney => matches!(view, ViewMode::Month | ViewMode::Year),
			Command::EditDay => matches!(view, ViewMode::Week | ViewMode::Day),
			Command::PopulateHolidays => matches!(view, ViewMode::Week | ViewMode::Month),
			Command::QuickAdjust(_)
			| Command::CutDay
			| Command::CopyDay
			| Command::PasteDay => view == ViewMode::Week,
			Command::AddAllocation => matches!(view, ViewMode::Week | ViewMode::Day),
			Command::EditAllocation | Command::DeleteAllocation | Command::ToggleEntered => {
				matches!(view, ViewMode::Day | ViewMode::Allocations)
			}
			Command::NewTicket
			| Command::EditTicket
			| Command::ToggleArchiveTicket
			| Command::DeleteTicket
			| Command::SearchTickets
			| Command::ToggleShowArchived => view == ViewMode::Tickets,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ViewMode {
	Week,
	Month,
	Year,
	Day,
	Allocations,
	Tickets,
}

impl ViewMode {
	fn next(self) -> ViewMode {
		match self {
			ViewMode::Week => ViewMode::Month,
			ViewMode::Month => ViewMode::Year,
			ViewMode::Year => ViewMode::Day,
			ViewMode::Day => ViewMode::Allocations,
			ViewMode::Allocations => ViewMode::Tickets,
			ViewMode::Tickets => ViewMode::Week,
		}
	}

	fn prev(self) -> ViewMode {
		match self {
			ViewMode::Week => ViewMode::Tickets,
			ViewMode::Month => ViewMode::Week,
			ViewMode::Year => ViewMode::Month,
			ViewMode::Day => ViewMode::Year,
			ViewMode::Allocations => ViewMode::Day,
			ViewMode::Tickets => ViewMode::Allocations,
		}
	}
}

#[derive(Debug, Clone)]
enum InputMode {
	Normal,
	Form(FormState),
	Select(SelectState),
}

#[derive(Debug, Clone)]
struct FormState {
	title: String,
	fields: Vec<FormField>,
	active: usize,
	notes: Vec<String>,
	kind: FormKind,
}

impl FormState {
	fn new(title: impl Into<String>, kind: FormKind, fields: Vec<(&str, String)>) -> Self {
		Self {
			title: title.into(),
			fields: fields
				.into_iter()
				.map(|(label, input)| FormField {
					label: label.to_string(),
					input,
				})
				.collect(),
			active: 0,
			notes: Vec::new(),
			kind,
		}
	}

	fn value(&self, index: usize) -> &str {
		self.fields
			.get(index)
			.map(|field| field.input.as_str())
			.unwrap_or("")
	}
}

#[derive(Debug, Clone)]
struct FormField {
	label: String,
	input: String,
}

#[derive(Debug, Clone)]
enum FormKind {
	EditDay { date: NaiveDate },
	NewTicket { allocate_for: Option<NaiveDate> },
	EditTicket { id: String },
	AllocationHours { ticket_id: String, date: NaiveDate },
}

#[derive(Debug, Clone)]
struct SelectState {
	title: String,
	options: Vec<SelectOption>,
	selected: usize,
	kind: SelectKind,
}

impl SelectState {
	fn new(title: impl Into<String>, kind: SelectKind, options: Vec<SelectOption>) -> Self {
		Self {
			title: title.into(),
			options,
			selected: 0,
			kind,
		}
	}

	fn move_selection(&mut self, delta: i32) {
		self.selected = step(self.selected, delta, self.options.len());
	}

	fn selected_option(&self) -> Option<&SelectOption> {
		self.options.get(self.selected)
	}
}

#[derive(Debug, Clone)]
struct SelectOption {
	label: String,
	value: Option<String>,
	style: Style,
}

impl SelectOption {
	fn new(label: impl Into<String>, value: Option<String>, style: Style) -> Self {
		Self {
			label: label.into(),
			value,
			style,
		}
	}
}

#[derive(Debug, Clone)]
enum SelectKind {
	MonthPick,
	TicketPick { date: NaiveDate },
	ConfirmQuickAdjust { date: NaiveDate, adjust: AdjustType },
	ConfirmDeleteAllocation { ticket_id: String, date: NaiveDate },
	ConfirmDeleteTicket { id: String },
}

#[derive(Debug)]
enum FormOutcome {
	NextForm(FormState),
	Done(String),
}

enum SelectOutcome {
	NextForm(FormState),
	Done(String),
}

struct App {
	today: NaiveDate,
	anchor_year: i32,
	anchor_month: u32,
	weeks: Vec<(NaiveDate, NaiveDate)>,
	week_index: usize,
	day_cursor: usize,
	day_index: usize,
	allocations_index: usize,
	ticket_index: usize,
	ticket_search: String,
	ticket_search_active: bool,
	show_archived: bool,
	show_money: bool,
	view: ViewMode,
	config: Config,
	entries: HashMap<NaiveDate, TimeEntry>,
	allocated: BTreeMap<NaiveDate, Decimal>,
	clipboard: Option<TimeEntry>,
	mode: InputMode,
	status: String,
}

impl App {
	fn new(store: &Store) -> Result<App, StorageError> {
		let today = Local::now().date_naive();
		let mut app = App {
			today,
			anchor_year: today.year(),
			anchor_month: today.month(),
			weeks: Vec::new(),
			week_index: 0,
			day_cursor: 0,
			day_index: 0,
			allocations_index: 0,
			ticket_index: 0,
			ticket_search: String::new(),
			ticket_search_active: false,
			show_archived: false,
			show_money: false,
			view: ViewMode::Week,
			config: store.load_config()?,
			entries: HashMap::new(),
			allocated: BTreeMap::new(),
			clipboard: None,
			mode: InputMode::Normal,
			status: "Ready".to_string(),
		};
		app.rebuild_weeks();
		app.reload(store)?;
		app.select_date(today);
		Ok(app)
	}

	fn rebuild_weeks(&mut self) {
		self.weeks = weeks_in_month(self.anchor_year, self.anchor_month);
		self.week_index = self.week_index.min(self.weeks.len().saturating_sub(1));
	}

	fn visible_range(&self) -> (NaiveDate, NaiveDate) {
		let start = self
			.weeks
			.first()
			.map(|&(start, _)| start)
			.unwrap_or(self.today);
		let end = self
			.weeks
			.last()
			.map(|&(_, end)| end)
			.unwrap_or(self.today);
		(start, end)
	}

	fn reload(&mut self, store: &Store) -> Result<(), StorageError> {
		let (start, end) = self.visible_range();
		self.entries = store
			.entries_between(start, end)?
			.into_iter()
			.map(|entry| (entry.date, entry))
			.collect();
		self.allocated = store.allocated_hours_between(start, end)?;
		Ok(())
	}

	fn selected_date(&self) -> NaiveDate {
		self.weeks
			.get(self.week_index)
			.map(|&(start, _)| start + Duration::days(self.day_cursor as i64))
			.unwrap_or(self.today)
	}

	fn find_week_for_date(&self, date: NaiveDate) -> usize {
		self.weeks
			.iter()
			.position(|&(start, end)| date >= start && date <= end)
			.unwrap_or(0)
	}

	fn select_date(&mut self, date: NaiveDate) {
		self.week_index = self.find_week_for_date(date);
		if let Some(&(start, _)) = self.weeks.get(self.week_index) {
			self.day_cursor = (date - start).num_days().clamp(0, 6) as usize;
		}
	}

	fn set_month(&mut self, store: &Store, year: i32, month: u32) -> Result<(), StorageError> {
		self.anchor_year = year;
		self.anchor_month = month;
		self.rebuild_weeks();
		self.reload(store)?;
		self.select_date(first_day_of_month(year, month));
		Ok(())
	}

	fn goto_today(&mut self, store: &Store) -> Result<(), StorageError> {
		self.today = Local::now().date_naive();
		self.anchor_year = self.today.year();
		self.anchor_month = self.today.month();
		self.rebuild_weeks();
		self.reload(store)?;
		self.select_date(self.today);
		Ok(())
	}

	fn focus_date(&mut self, store: &Store, date: NaiveDate) -> Result<(), StorageError> {
		let (start, end) = self.visible_range();
		if date < start || date > end {
			let (year, month) = week_month(week_start(date), week_end(date));
			self.anchor_year = year;
			self.anchor_month = month;
			self.rebuild_weeks();
			self.reload(store)?;
		}
		self.select_date(date);
		Ok(())
	}

	fn shift_unit(&mut self, store: &Store, delta: i32) -> Result<(), StorageError> {
		match self.view {
			ViewMode::Week => self.shift_week(store, delta),
			ViewMode::Month | ViewMode::Allocations => {
				let (year, month) = shift_month(self.anchor_year, self.anchor_month, delta);
				self.set_month(store, year, month)
			}
			ViewMode::Year => {
				let (year, month) = shift_month(self.anchor_year, self.anchor_month, delta * 12);
				self.set_month(store, year, month)
			}
			ViewMode::Day => self.shift_day(store, delta),
			ViewMode::Tickets => Ok(()),
		}
	}

	fn shift_week(&mut self, store: &Store, delta: i32) -> Result<(), StorageError> {
		if delta < 0 {
			if self.week_index == 0 {
				let (year, month) = shift_month(self.anchor_year, self.anchor_month, -1);
				self.anchor_year = year;
				self.anchor_month = month;
				self.rebuild_weeks();
				self.week_index = self.weeks.len().saturating_sub(1);
				self.reload(store)?;
			} else {
				self.week_index -= 1;
			}
		} else if self.week_index + 1 >= self.weeks.len() {
			let (year, month) = shift_month(self.anchor_year, self.anchor_month, 1);
			self.anchor_year = year;
			self.anchor_month = month;
			self.rebuild_weeks();
			self.week_index = 0;
			self.reload(store)?;
		} else {
			self.week_index += 1;
		}
		Ok(())
	}

	fn shift_day(&mut self, store: &Store, delta: i32) -> Result<(), StorageError> {
		let date = self.selected_date() + Duration::days(delta as i64);
		self.focus_date(store, date)
	}

	fn move_cursor(&mut self, view: &ViewModel, delta: i32) {
		match self.view {
			ViewMode::Week => self.day_cursor = step(self.day_cursor, delta, 7),
			ViewMode::Day => {
				if let BodyView::Day(day) = &view.body {
					self.day_index = step(self.day_index, delta, day.allocations.len());
				}
			}
			ViewMode::Allocations => {
				if let BodyView::Allocations(allocations) = &view.body {
					self.allocations_index =
						step(self.allocations_index, delta, allocations.rows.len());
				}
			}
			ViewMode::Tickets => {
				if let BodyView::Tickets(tickets) = &view.body {
					self.ticket_index = step(self.ticket_index, delta, tickets.rows.len());
				}
			}
			_ => {}
		}
	}

	fn clamp_selection(&mut self, view: &ViewModel) {
		self.day_cursor = self.day_cursor.min(6);
		match &view.body {
			BodyView::Day(day) => {
				self.day_index = clamp_index(self.day_index, day.allocations.len());
			}
			BodyView::Allocations(allocations) => {
				self.allocations_index =
					clamp_index(self.allocations_index, allocations.rows.len());
			}
			BodyView::Tickets(tickets) => {
				self.ticket_index = clamp_index(self.ticket_index, tickets.rows.len());
			}
			_ => {}
		}
	}
}

struct ViewModel {
	week: WeekView,
	body: BodyView,
}

enum BodyView {
	Week,
	Month(MonthView),
	Year(YearView),
	Day(DayView),
	Allocations(AllocationsView),
	Tickets(TicketsView),
}

struct WeekView {
	start: NaiveDate,
	end: NaiveDate,
	number: usize,
	count: usize,
	month_label: String,
	rows: Vec<WeekRow>,
	totals: WeekTotals,
	target: Decimal,
}

struct WeekRow {
	date: NaiveDate,
	entry: TimeEntry,
	allocated: Decimal,
	outside_month: bool,
	weekend: bool,
}

struct MonthView {
	label: String,
	rows: Vec<MonthWeekRow>,
	totals: WeekTotals,
	target: Decimal,
}

struct MonthWeekRow {
	start: NaiveDate,
	end: NaiveDate,
	totals: WeekTotals,
}

struct YearView {
	start: NaiveDate,
	end: NaiveDate,
	rows: Vec<YearMonthRow>,
	totals: WeekTotals,
}

struct YearMonthRow {
	year: i32,
	month: u32,
	totals: WeekTotals,
}

struct DayView {
	date: NaiveDate,
	entry: TimeEntry,
	holiday: Option<&'static str>,
	allocations: Vec<(TicketAllocation, String)>,
	allocated: Decimal,
	status: AllocationStatus,
}

struct AllocationsView {
	label: String,
	rows: Vec<(TicketAllocation, String)>,
	total: Decimal,
}

struct TicketsView {
	rows: Vec<Ticket>,
}

#[cfg(test)]
mod tests {
	use chrono::{NaiveDate, NaiveTime};
	use crossterm::event::KeyCode;
	use tempfile::TempDir;

	use super::{
		apply_quick_adjust, build_day_form, copy_day, insert_form_char, paste_day, step,
		submit_form, App, Command, FormOutcome, ViewMode,
	};
	use crate::domain::{AdjustType, TimeEntry};
	use crate::storage::Store;

	fn date(text: &str) -> NaiveDate {
		NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
	}

	fn september_app() -> (TempDir, Store, App) {
		let dir = TempDir::new().unwrap();
		let store = Store::open(dir.path().join("timecard.db")).unwrap();
		let mut app = App::new(&store).unwrap();
		app.anchor_year = 2025;
		app.anchor_month = 9;
		app.week_index = 0;
		app.day_cursor = 0;
		app.rebuild_weeks();
		app.reload(&store).unwrap();
		(dir, store, app)
	}

	#[test]
	fn week_navigation_crosses_month_boundaries() {
		let (_dir, store, mut app) = september_app();
		app.shift_week(&store, -1).unwrap();
		assert_eq!((app.anchor_year, app.anchor_month), (2025, 8));
		assert_eq!(app.week_index, app.weeks.len() - 1);

		app.shift_week(&store, 1).unwrap();
		assert_eq!((app.anchor_year, app.anchor_month), (2025, 9));
		assert_eq!(app.week_index, 0);
	}

	#[test]
	fn selecting_a_date_places_the_cursor_in_its_week() {
		let (_dir, _store, mut app) = september_app();
		app.select_date(date("2025-09-17"));
		let (start, end) = app.weeks[app.week_index];
		assert!(start <= date("2025-09-17") && date("2025-09-17") <= end);
		assert_eq!(app.selected_date(), date("2025-09-17"));
	}

	#[test]
	fn quick_adjust_writes_a_standard_day() {
		let (_dir, store, mut app) = september_app();
		let target = date("2025-09-01");
		app.select_date(target);
		let cursor = app.day_cursor;

		let message = apply_quick_adjust(&mut app, &store, target, AdjustType::Leave).unwrap();
		assert_eq!(message, "Leave recorded for Sep 01");
		let entry = store.entry(target).unwrap().unwrap();
		assert_eq!(entry.adjustment_minutes, Some(450));
		assert_eq!(entry.adjust_type, Some(AdjustType::Leave));
		assert!(entry.clock_in.is_none());
		assert_eq!(app.day_cursor, cursor + 1);
	}

	#[test]
	fn paste_rewrites_the_target_date_fields() {
		let (_dir, store, mut app) = september_app();
		let source = date("2025-09-01");
		let mut entry = TimeEntry::blank(source);
		entry.clock_in = NaiveTime::from_hms_opt(9, 0, 0);
		entry.clock_out = NaiveTime::from_hms_opt(17, 0, 0);
		entry.comment = Some("standup".to_string());
		store.save_entry(&entry).unwrap();
		app.reload(&store).unwrap();

		app.select_date(source);
		assert_eq!(copy_day(&mut app), "copied Sep 01");
		app.select_date(date("2025-09-02"));
		paste_day(&mut app, &store).unwrap();

		let pasted = store.entry(date("2025-09-02")).unwrap().unwrap();
		assert_eq!(pasted.day_of_week, "Tue");
		assert_eq!(pasted.comment.as_deref(), Some("standup"));
		assert_eq!(pasted.worked_minutes(), 480);
	}

	#[test]
	fn day_form_round_trips_an_entry() {
		let (_dir, store, mut app) = september_app();
		let target = date("2025-09-03");
		let mut form = build_day_form(&app, target);
		form.fields[0].input = "09:00".to_string();
		form.fields[1].input = "30".to_string();
		form.fields[2].input = "17:00".to_string();
		form.fields[5].input = "pairing".to_string();

		let outcome = submit_form(form, &mut app, &store).unwrap();
		assert!(matches!(outcome, FormOutcome::Done(_)));
		let entry = store.entry(target).unwrap().unwrap();
		assert_eq!(entry.worked_minutes(), 450);
		assert_eq!(entry.comment.as_deref(), Some("pairing"));
	}

	#[test]
	fn adjustment_hours_need_a_type() {
		let (_dir, store, mut app) = september_app();
		let mut form = build_day_form(&app, date("2025-09-04"));
		form.fields[3].input = "7.5".to_string();
		let err = submit_form(form, &mut app, &store).unwrap_err();
		assert_eq!(err, "adjustment hours require an adjust type");
	}

	#[test]
	fn type_field_advances_on_a_valid_code() {
		let (_dir, _store, app) = september_app();
		let mut form = build_day_form(&app, date("2025-09-05"));
		form.active = 4;
		insert_form_char(&mut form, 'l');
		assert_eq!(form.fields[4].input, "L");
		assert_eq!(form.active, 5);
	}

	#[test]
	fn commands_respect_the_active_view() {
		assert_eq!(
			Command::for_key(KeyCode::Enter, ViewMode::Week),
			Some(Command::EditDay),
		);
		assert_eq!(
			Command::for_key(KeyCode::Enter, ViewMode::Day),
			Some(Command::EditAllocation),
		);
		assert_eq!(
			Command::for_key(KeyCode::Char('x'), ViewMode::Week),
			Some(Command::CutDay),
		);
		assert_eq!(
			Command::for_key(KeyCode::Char('x'), ViewMode::Tickets),
			Some(Command::ToggleShowArchived),
		);
		assert_eq!(Command::for_key(KeyCode::Char('L'), ViewMode::Tickets), None);
	}

	#[test]
	fn step_clamps_at_both_ends() {
		assert_eq!(step(0, -1, 7), 0);
		assert_eq!(step(6, 1, 7), 6);
		assert_eq!(step(3, 2, 7), 5);
		assert_eq!(step(0, 1, 0), 0);
	}
}
