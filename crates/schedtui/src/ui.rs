#![forbid(unsafe_code)]

//! The ratatui view layer.
//!
//! Pure projection of [`Session`] state onto the frame: nothing here
//! mutates the session, and every region redraws in full from the
//! latest engine snapshots. Starving rows get a warning style plus a
//! visual marker; empty queues and empty history render explicit
//! notices so the operator can tell "nothing there" from "not loaded".

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Cell, List, ListItem, Paragraph, Row, Table};

use schedtui_core::{QueueMember, QueueType, Severity, is_starving, partition_pending};

use crate::form::FormField;
use crate::session::{Focus, Session};

const STARVATION_MARKER: &str = "\u{26a0}"; // ⚠

pub fn render(frame: &mut Frame, session: &Session) {
    let [header, main, bottom, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(10),
        Constraint::Length(8),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, session);

    let [left, right] =
        Layout::horizontal([Constraint::Percentage(58), Constraint::Percentage(42)]).areas(main);

    let [table_area, queues_area] =
        Layout::vertical([Constraint::Min(8), Constraint::Length(9)]).areas(left);
    render_process_table(frame, table_area, session);
    render_queues(frame, queues_area, session);

    let [stats_area, log_area, history_area] = Layout::vertical([
        Constraint::Length(10),
        Constraint::Min(5),
        Constraint::Min(5),
    ])
    .areas(right);
    render_statistics(frame, stats_area, session);
    render_log(frame, log_area, session);
    render_history(frame, history_area, session);

    let [form_area, help_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(bottom);
    render_form(frame, form_area, session);
    render_help(frame, help_area);

    render_status(frame, status, session);
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let mut spans = vec![
        Span::styled("schedtui", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  engine "),
        Span::styled(session.engine_url().to_owned(), Style::default().fg(Color::Cyan)),
        Span::raw("  sim time "),
        Span::styled(
            session.clock.value().to_string(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ];
    if session.step_in_flight() {
        spans.push(Span::styled("  stepping...", Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_process_table(frame: &mut Frame, area: Rect, session: &Session) {
    let header = Row::new(["PID", "Name", "Arrival", "Burst", "Priority", "Queue", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows = session.processes.iter().map(|p| {
        let starving = is_starving(p.waiting_time);
        let status = match (p.completed, starving) {
            (true, _) => "Completed".to_owned(),
            (false, true) => format!("Pending {STARVATION_MARKER}"),
            (false, false) => "Pending".to_owned(),
        };
        let style = if starving {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if p.completed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new([
            Cell::from(p.pid.to_string()),
            Cell::from(p.name.clone()),
            Cell::from(p.arrival_time.to_string()),
            Cell::from(p.burst_time.to_string()),
            Cell::from(p.priority.to_string()),
            Cell::from(p.queue_type.to_string()),
            Cell::from(status),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Min(8),
        Constraint::Length(7),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(10),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::bordered().title(format!("Processes ({})", session.processes.len())));
    frame.render_widget(table, area);
}

fn render_queues(frame: &mut Frame, area: Rect, session: &Session) {
    let partition = partition_pending(&session.processes);
    let [fg_area, bg_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);
    render_queue(frame, fg_area, QueueType::Foreground, &partition.foreground);
    render_queue(frame, bg_area, QueueType::Background, &partition.background);
}

fn render_queue(frame: &mut Frame, area: Rect, queue: QueueType, members: &[QueueMember<'_>]) {
    let title = format!("{} queue ({})", capitalize(queue.as_str()), members.len());
    let block = Block::bordered().title(title);

    if members.is_empty() {
        let notice = Paragraph::new(
            Line::from(format!("No processes in {queue} queue")).style(Style::default().italic()),
        )
        .block(block);
        frame.render_widget(notice, area);
        return;
    }

    let items = members.iter().map(|m| {
        let mut lines = vec![Line::from(vec![
            Span::styled(m.record.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!(
                " (PID {})  remaining {}  waiting {}",
                m.record.pid, m.record.remaining_time, m.record.waiting_time
            )),
        ])];
        if m.starving {
            lines.push(Line::from(Span::styled(
                format!("  {STARVATION_MARKER} starvation risk"),
                Style::default().fg(Color::Red),
            )));
        }
        ListItem::new(Text::from(lines))
    });
    frame.render_widget(List::new(items).block(block), area);
}

fn render_statistics(frame: &mut Frame, area: Rect, session: &Session) {
    let s = &session.stats;
    let lines = vec![
        stat_line("Current Time", s.current_time.to_string()),
        stat_line("Total Processes", s.total_processes.to_string()),
        stat_line("Completed Processes", s.completed_processes.to_string()),
        stat_line("Foreground Queue Size", s.foreground_queue_size.to_string()),
        stat_line("Background Queue Size", s.background_queue_size.to_string()),
        stat_line("Average Waiting Time", format!("{:.2}", s.avg_waiting_time)),
        stat_line("Average Turnaround Time", format!("{:.2}", s.avg_turnaround_time)),
        stat_line("Starvation Count", s.starvation_count.to_string()),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Statistics")),
        area,
    );
}

fn stat_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<24}")),
        Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
    ])
}

fn render_log(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::bordered().title(format!("Execution log ({})", session.log.len()));
    let visible = area.height.saturating_sub(2) as usize;
    let entries = session.log.entries();
    let skip = entries.len().saturating_sub(visible);
    let items = entries[skip..]
        .iter()
        .map(|entry| ListItem::new(entry.to_string()));
    frame.render_widget(List::new(items).block(block), area);
}

fn render_history(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::bordered().title("History");
    match &session.history {
        None => {
            let hint = Paragraph::new(
                Line::from("Press h to load simulation history").style(Style::default().dim()),
            )
            .block(block);
            frame.render_widget(hint, area);
        }
        Some(entries) if entries.is_empty() => {
            let notice = Paragraph::new(
                Line::from("No simulation history found.").style(Style::default().italic()),
            )
            .block(block);
            frame.render_widget(notice, area);
        }
        Some(entries) => {
            let items = entries.iter().map(|e| {
                let lines = vec![
                    Line::from(Span::styled(
                        format!("Simulation at {}", e.timestamp),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(format!(
                        "  {}/{} completed  waiting {:.2}  turnaround {:.2}  starvation {}",
                        e.completed_processes,
                        e.total_processes,
                        e.avg_waiting_time,
                        e.avg_turnaround_time,
                        e.starvation_count
                    )),
                ];
                ListItem::new(Text::from(lines))
            });
            frame.render_widget(List::new(items).block(block), area);
        }
    }
}

fn render_form(frame: &mut Frame, area: Rect, session: &Session) {
    let focused = session.focus == Focus::Form;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::bordered().title("Add process").border_style(border_style);

    let form = &session.form;
    let field_line = |field: FormField, value: String| {
        let active = focused && form.field == field;
        let marker = if active { "\u{25b8} " } else { "  " }; // ▸
        let style = if active {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{:<13}", field.label()), style),
            Span::styled(value, style),
        ])
    };

    let queue_value = format!("\u{25c2} {} \u{25b8}", form.queue); // ◂ foreground ▸
    let lines = vec![
        field_line(FormField::Name, form.name.clone()),
        field_line(FormField::Arrival, form.arrival.clone()),
        field_line(FormField::Burst, form.burst.clone()),
        field_line(FormField::Priority, form.priority.clone()),
        field_line(FormField::Queue, queue_value),
        Line::from(Span::styled(
            "  Enter submit, Tab next field, Esc back",
            Style::default().dim(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from("a  add process        s  start simulation"),
        Line::from("n  step (or space)    v  save results"),
        Line::from("r  reset              h  load history"),
        Line::from("q  quit"),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("Keys")),
        area,
    );
}

fn render_status(frame: &mut Frame, area: Rect, session: &Session) {
    let line = match session.notices.latest() {
        Some(notice) => {
            let style = match notice.severity {
                Severity::Success => Style::default().fg(Color::Green),
                Severity::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(
                format!("{} {}", notice.severity.icon(), notice.message),
                style.add_modifier(Modifier::BOLD),
            ))
        }
        None => Line::from(Span::styled(
            "ready",
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
