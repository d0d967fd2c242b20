use explorer_core::SessionStore;
use explorer_protocol::artifact::Artifact;
use explorer_protocol::request::HandoffExecution;
use explorer_protocol::turn::Capability;
use explorer_protocol::turn::Role;
use explorer_protocol::turn::Turn;
use ratatui::layout::Constraint;
use ratatui::layout::Direction;
use ratatui::layout::Layout;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;

use crate::app::ActivePage;
use crate::app::App;
use crate::pages::PageState;
use crate::pages::Phase;

pub(crate) fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(1),    // page body
            Constraint::Length(2), // two-line footer (help + status)
        ])
        .split(frame.area());

    draw_tabs(frame, chunks[0], app);
    match app.active {
        ActivePage::Home => draw_home(frame, chunks[1]),
        ActivePage::Capability(idx) => {
            let App {
                session,
                pages,
                editing,
                ..
            } = app;
            if let Some(page) = pages.get_mut(idx) {
                draw_page(frame, chunks[1], session, page, *editing);
            }
        }
    }
    draw_footer(frame, chunks[2], app);
}

fn draw_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::new();
    let home_active = app.active == ActivePage::Home;
    spans.push(if home_active {
        " h Home ".bold().reversed()
    } else {
        " h Home ".dim()
    });
    for (idx, capability) in Capability::ALL.iter().enumerate() {
        let label = format!(" {} {} ", idx + 1, capability.label());
        let active = app.active == ActivePage::Capability(idx);
        spans.push(if active {
            label.bold().reversed()
        } else {
            label.dim()
        });
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_home(frame: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = vec![
        Line::from("Agents Explorer".magenta().bold()),
        Line::from("An interactive tour of the hosted agents API.".dim()),
        Line::from(""),
    ];
    for (idx, capability) in Capability::ALL.iter().enumerate() {
        let blurb = PageState::new(*capability).blurb();
        lines.push(Line::from(vec![
            format!("  {}  ", idx + 1).bold(),
            capability.label().cyan(),
            "  ".into(),
            blurb.dim(),
        ]));
    }
    lines.extend([
        Line::from(""),
        Line::from("Keys".bold()),
        Line::from("  1-5 pick a page · h home · q quit".dim()),
        Line::from("  ↑/↓ cycle example prompts · e edit a custom prompt · ⏎ submit".dim()),
        Line::from("  c copy last response · s save last response · x clear page · r reset session".dim()),
        Line::from("  p premium search (search page) · m handoff mode (orchestration page)".dim()),
    ]);
    let block = Block::default().borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_page(
    frame: &mut Frame,
    area: Rect,
    session: &SessionStore,
    page: &mut PageState,
    editing: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // blurb
            Constraint::Length(3), // prompt box
            Constraint::Min(1),    // history
        ])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(page.blurb().dim())), chunks[0]);
    draw_prompt(frame, chunks[1], page, editing);
    draw_history(frame, chunks[2], session, page);
}

fn draw_prompt(frame: &mut Frame, area: Rect, page: &PageState, editing: bool) {
    let mut title_spans: Vec<Span> = vec!["Prompt".bold()];
    match page.capability {
        Capability::Search => {
            title_spans.push("  • ".into());
            title_spans.push(if page.premium {
                "premium web search".magenta()
            } else {
                "standard web search".dim()
            });
        }
        Capability::Orchestration => {
            title_spans.push("  • ".into());
            title_spans.push(match page.handoff_execution {
                HandoffExecution::Server => "server-side handoffs".dim(),
                HandoffExecution::Client => "client-side handoffs".magenta(),
            });
        }
        _ => {}
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title_spans));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if page.use_custom {
        let text = page.input.text();
        frame.render_widget(Paragraph::new(text.as_str()), inner);
        if editing {
            let x = inner.x + (page.input.cursor() as u16).min(inner.width.saturating_sub(1));
            frame.set_cursor_position((x, inner.y));
        }
    } else {
        let example = page
            .examples
            .get(page.selected_example)
            .copied()
            .unwrap_or("");
        let counter = format!(
            "  ({}/{} · ↑/↓ to cycle, e for custom)",
            page.selected_example + 1,
            page.examples.len()
        );
        frame.render_widget(
            Paragraph::new(Line::from(vec![example.into(), counter.dim()])),
            inner,
        );
    }
}

fn draw_history(frame: &mut Frame, area: Rect, session: &SessionStore, page: &mut PageState) {
    let turns = session.history_for(page.capability);
    let mut lines: Vec<Line> = Vec::new();
    for turn in turns {
        lines.extend(turn_lines(turn));
    }
    if let Phase::Error(message) = &page.phase {
        lines.push(Line::from(vec![
            "error ".red().bold(),
            message.clone().red(),
        ]));
        lines.push(Line::from("Adjust the prompt and submit again.".dim()));
    }
    if lines.is_empty() {
        lines.push(Line::from(
            "No turns yet. Pick a prompt and press ⏎ to submit.".dim(),
        ));
    }

    let block = Block::default().borders(Borders::ALL).title("History");
    let inner_height = block.inner(area).height.max(1);
    let inner_width = block.inner(area).width.max(1);
    let paragraph = Paragraph::new(Text::from(lines)).wrap(Wrap { trim: false });
    let total = paragraph.line_count(inner_width) as u16;
    let max_scroll = total.saturating_sub(inner_height);
    // A saturated offset means "stick to the bottom".
    page.scroll = page.scroll.min(max_scroll);
    frame.render_widget(paragraph.block(block).scroll((page.scroll, 0)), area);
}

fn turn_lines(turn: &Turn) -> Vec<Line<'static>> {
    let stamp = turn.timestamp.format("%H:%M:%S").to_string();
    let mut lines: Vec<Line> = Vec::new();
    let header = match turn.role {
        Role::User => Line::from(vec!["You".cyan().bold(), format!("  {stamp}").dim()]),
        Role::Agent => Line::from(vec!["Agent".magenta().bold(), format!("  {stamp}").dim()]),
    };
    lines.push(header);
    for text_line in turn.text().lines() {
        lines.push(Line::from(format!("  {text_line}")));
    }
    if let Some(artifact) = turn.artifact() {
        lines.extend(artifact_lines(artifact));
    }
    lines.push(Line::from(""));
    lines
}

fn artifact_lines(artifact: &Artifact) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = Vec::new();
    match artifact {
        Artifact::CodeRun { code_blocks, .. } => {
            for (idx, block) in code_blocks.iter().enumerate() {
                lines.push(Line::from(
                    format!("  code execution {}", idx + 1).yellow().bold(),
                ));
                for code_line in block.code.lines() {
                    lines.push(Line::from(format!("  │ {code_line}").yellow()));
                }
                lines.push(Line::from("  output".dim()));
                for out_line in block.output.lines() {
                    lines.push(Line::from(format!("  │ {out_line}")));
                }
            }
        }
        Artifact::Image { image, .. } => {
            if let Some(image) = image {
                let dims = image::load_from_memory(&image.bytes)
                    .map(|img| format!(", {}x{}", img.width(), img.height()))
                    .unwrap_or_default();
                lines.push(Line::from(
                    format!(
                        "  [image {} — {} bytes{dims}; press s to save]",
                        image.download_name(),
                        image.bytes.len()
                    )
                    .dim(),
                ));
            } else {
                lines.push(Line::from("  [no image file in the response]".dim()));
            }
        }
        Artifact::SearchAnswer { sources, .. } => {
            if !sources.is_empty() {
                lines.push(Line::from("  sources".bold()));
                for (idx, source) in sources.iter().enumerate() {
                    lines.push(Line::from(vec![
                        format!("  [{}] ", idx + 1).dim(),
                        source.title.clone().into(),
                        " — ".dim(),
                        source.url.clone().blue(),
                        format!(" ({})", source.source).dim(),
                    ]));
                }
            }
        }
        Artifact::Orchestration {
            handoffs,
            tool_executions,
            ..
        } => {
            if !handoffs.is_empty() {
                lines.push(Line::from("  handoffs".bold()));
                for handoff in handoffs {
                    lines.push(Line::from(vec![
                        "  → ".dim(),
                        handoff.agent_name.clone().cyan(),
                        ": ".dim(),
                        handoff.inputs.clone().into(),
                    ]));
                }
            }
            if !tool_executions.is_empty() {
                lines.push(Line::from("  tool executions".bold()));
                for tool in tool_executions {
                    lines.push(Line::from(format!("  {}", tool.name).yellow()));
                    for code_line in tool.code.lines() {
                        lines.push(Line::from(format!("  │ {code_line}").yellow()));
                    }
                    for out_line in tool.output.lines() {
                        lines.push(Line::from(format!("  │ {out_line}").dim()));
                    }
                }
            }
        }
        Artifact::FunctionExchange { calls, results, .. } => {
            if !calls.is_empty() {
                lines.push(Line::from("  function calls".bold()));
                for call in calls {
                    lines.push(Line::from(
                        format!("  {}({})", call.name, call.arguments).yellow(),
                    ));
                }
            }
            for result in results {
                if result.name == "calculate_loan_payment" {
                    let monthly = &result.result["monthly_payment"];
                    let interest = &result.result["total_interest"];
                    let total = &result.result["total_payment"];
                    lines.push(Line::from(
                        format!(
                            "  monthly payment ${monthly} · total interest ${interest} · total payment ${total}"
                        )
                        .green(),
                    ));
                } else {
                    lines.push(Line::from(format!("  {} → {}", result.name, result.result).dim()));
                }
            }
        }
    }
    lines
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let hints = if app.editing {
        "⏎ submit · Esc stop editing"
    } else if app.active == ActivePage::Home {
        "1-5 pages · q quit"
    } else {
        "⏎ submit · ↑/↓ example · e custom · c copy · s save · x clear · r reset · h home · q quit"
    };
    frame.render_widget(Paragraph::new(Line::from(hints.dim())), rows[0]);

    if app.any_busy() {
        let throbber = throbber_widgets_tui::Throbber::default()
            .label(app.status.clone())
            .throbber_style(Style::default().magenta());
        frame.render_stateful_widget(throbber, rows[1], &mut app.throbber);
    } else {
        frame.render_widget(Paragraph::new(Line::from(app.status.clone())), rows[1]);
    }
}
