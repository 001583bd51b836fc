use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use rd_core::NodeKind;
use rd_narrative::{AdvanceOutcome, NarrativeSession};

const HELP: &str = "\
  select <start> <end>   black out characters start..=end
  preview <start> <end>  check a selection against the budget
  erase <idx>            restore one character
  clear                  restore every character
  submit                 apply this node's change rules
  score                  apply this node's result rules
  advance                move to the next node
  branch <i>             take branch i of a branch node
  succeed | fail         resolve a timed challenge
  wait <secs>            let time pass
  vars                   show variables and scores
  status                 show the current node
  reset                  return to the start node
  quit                   leave";

pub fn run(graph_path: &Path, config_path: Option<&Path>) -> Result<(), String> {
    let graph = super::load_graph(graph_path)?;
    let config = super::load_config(config_path)?;
    let name = graph.name.clone();

    let mut session =
        NarrativeSession::new(graph, config).map_err(|e| format!("failed to start session: {e}"))?;

    println!("  {} {}", "Playing".bold(), name);
    println!("  Type 'help' for commands, 'quit' to exit.\n");
    println!("{}\n", render_node(&session));

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("q") {
            println!("Goodbye!");
            break;
        }

        match process(&mut session, input) {
            Ok(output) => {
                if !output.is_empty() {
                    println!("{output}\n");
                }
            }
            Err(e) => {
                println!("{}\n", e.yellow());
            }
        }
    }

    Ok(())
}

fn process(session: &mut NarrativeSession, input: &str) -> Result<String, String> {
    let mut words = input.split_whitespace();
    let cmd = words.next().unwrap_or("").to_lowercase();
    let args: Vec<&str> = words.collect();
    let surface = session
        .current_node()
        .content()
        .map(|c| c.surface.clone())
        .unwrap_or_default();

    match cmd.as_str() {
        "select" => {
            let (start, end) = two_indices(&args)?;
            let outcome = session.commit_selection(&surface, start, end);
            if outcome.accepted {
                Ok(format!(
                    "{}\n  budget: {} used, {} left",
                    render_node(session),
                    outcome.total_used,
                    outcome.remaining
                ))
            } else {
                Err(format!(
                    "Selection rejected ({} used, {} left).",
                    outcome.total_used, outcome.remaining
                ))
            }
        }
        "preview" => {
            let (start, end) = two_indices(&args)?;
            let preview = session.preview_selection(&surface, start, end);
            let verdict = if preview.would_exceed {
                "over budget".red().to_string()
            } else {
                "fits".green().to_string()
            };
            Ok(format!(
                "  {verdict}: {} selected if committed",
                preview.total_if_committed
            ))
        }
        "erase" => {
            let idx = index(args.first())?;
            session.erase_at(&surface, idx);
            Ok(render_node(session))
        }
        "clear" => {
            session.clear_all();
            Ok(render_node(session))
        }
        "submit" => {
            let id = session.current_node().id;
            let report = session.submit(id).map_err(|e| e.to_string())?;
            if report.variable_changes.is_empty() {
                return Ok("  No rules fired.".into());
            }
            let lines: Vec<String> = report
                .variable_changes
                .iter()
                .map(|c| format!("  {c}"))
                .collect();
            Ok(lines.join("\n"))
        }
        "score" => {
            let report = session.score();
            let mut out = if report.fired.is_empty() {
                "  No results.".to_string()
            } else {
                format!("  Results: {}", report.fired.join(", "))
            };
            for (counter, total) in &report.totals {
                out.push_str(&format!("\n  {counter}: {total}"));
            }
            Ok(out)
        }
        "advance" => {
            let outcome = session.advance().map_err(|e| e.to_string())?;
            Ok(describe_move(session, &outcome))
        }
        "branch" => {
            let i = index(args.first())?;
            let outcome = session.select_branch(i).map_err(|e| e.to_string())?;
            Ok(describe_move(session, &outcome))
        }
        "succeed" | "fail" => {
            let outcome = session
                .report_challenge_outcome(cmd == "succeed")
                .map_err(|e| e.to_string())?;
            Ok(describe_move(session, &outcome))
        }
        "wait" => {
            let secs: f64 = args
                .first()
                .ok_or("Usage: wait <secs>")?
                .parse()
                .map_err(|_| "Seconds must be a number.".to_string())?;
            let elapsed =
                Duration::try_from_secs_f64(secs).map_err(|_| "Seconds must be positive.".to_string())?;
            match session.tick(elapsed).map_err(|e| e.to_string())? {
                Some(outcome) => Ok(format!(
                    "  {}\n{}",
                    "Time is up.".bold(),
                    describe_move(session, &outcome)
                )),
                None => match session.challenge_remaining() {
                    Some(left) => Ok(format!("  {:.1}s left.", left.as_secs_f64())),
                    None => Ok("  Time passes.".into()),
                },
            }
        }
        "vars" => Ok(render_vars(session)),
        "status" => Ok(render_node(session)),
        "reset" => {
            session.reset().map_err(|e| e.to_string())?;
            Ok(render_node(session))
        }
        "help" => Ok(HELP.to_string()),
        _ => Err(format!("Unknown command '{cmd}'. Type 'help' for commands.")),
    }
}

fn index(arg: Option<&&str>) -> Result<usize, String> {
    arg.ok_or("Missing index.")?
        .parse()
        .map_err(|_| "Indices must be non-negative integers.".to_string())
}

fn two_indices(args: &[&str]) -> Result<(usize, usize), String> {
    if args.len() != 2 {
        return Err("Expected two indices: <start> <end>".into());
    }
    Ok((index(args.first())?, index(args.get(1))?))
}

fn describe_move(session: &NarrativeSession, outcome: &AdvanceOutcome) -> String {
    if outcome.moved {
        render_node(session)
    } else {
        format!("  {} Nothing further.", "The end.".bold())
    }
}

fn render_node(session: &NarrativeSession) -> String {
    let node = session.current_node();
    let mut out = format!("  {} [{}]", node.label().bold(), node.kind.tag());

    match &node.kind {
        NodeKind::Terminal { ending } => {
            if let Some(ending) = ending {
                out.push_str(&format!("\n  Ending: {}", ending.cyan()));
            }
        }
        NodeKind::Branch { branches, .. } => {
            for (i, branch) in branches.iter().enumerate() {
                let label = if branch.name.is_empty() {
                    format!("branch {i}")
                } else {
                    branch.name.clone()
                };
                out.push_str(&format!("\n  {i}. {label}"));
            }
        }
        NodeKind::TimedChallenge { .. } => {
            if let Some(left) = session.challenge_remaining() {
                out.push_str(&format!("\n  {:.1}s to act", left.as_secs_f64()));
            }
        }
        NodeKind::Linear { .. } => {}
    }

    if let Some(content) = node.content() {
        let set = session.selections().set(&content.surface);
        let masked: String = content
            .text
            .chars()
            .enumerate()
            .map(|(i, c)| match set {
                Some(set) if set.contains(i) => '█',
                _ => c,
            })
            .collect();
        out.push_str(&format!("\n\n  {masked}\n"));

        let selected = session.selected_text();
        if !selected.is_empty() {
            out.push_str(&format!("\n  Hidden: {}", selected.dimmed()));
        }
        let coverage = session.coverage();
        if !coverage.is_empty() {
            let keywords: Vec<String> = coverage
                .iter()
                .map(|(id, covered)| {
                    if covered {
                        id.to_string().red().to_string()
                    } else {
                        id.to_string()
                    }
                })
                .collect();
            out.push_str(&format!("\n  Keywords: {}", keywords.join(", ")));
        }
        out.push_str(&format!(
            "\n  Budget: {}/{}",
            session.selections().total_used(),
            session.selections().ledger().max()
        ));
    }
    out
}

fn render_vars(session: &NarrativeSession) -> String {
    let vars = session.variables().snapshot();
    let mut out = String::from("  Variables:");
    if vars.is_empty() {
        out.push_str(" none");
    }
    for (id, value) in vars {
        out.push_str(&format!("\n    {id} = {value}"));
    }
    out.push_str("\n  Scores:");
    if session.scores().is_empty() {
        out.push_str(" none");
    }
    for (counter, total) in session.scores().totals() {
        out.push_str(&format!("\n    {counter} = {total}"));
    }
    out
}
