//! Headless play-through: drive the engine from a list of choices.

use std::path::Path;

use colored::Colorize;
use nv_core::Node;
use nv_engine::{EngineConfig, EngineEvent, NarrativeEngine};

/// Why a play-through stopped.
#[derive(Debug, PartialEq, Eq)]
enum Stop {
    Ending(String),
    AwaitingChoice(String),
    DeadEnd(String),
    StepLimit,
}

pub fn run(path: &Path, choices: &[String], json: bool, max_steps: u32) -> Result<(), String> {
    let graph = super::load_script(path)?;
    let mut engine =
        NarrativeEngine::new(graph, EngineConfig::default().with_typewriter(false));

    let stop = play_through(&mut engine, choices, max_steps, |event| {
        print_event(event, json)
    })?;

    if !json {
        println!();
        match stop {
            Stop::Ending(id) => println!(
                "  Reached ending '{id}' after {} steps.",
                engine.step_count()
            ),
            Stop::AwaitingChoice(id) => println!("  Stopped at '{id}', waiting for a choice."),
            Stop::DeadEnd(id) => println!("  Stopped at '{id}': no way to continue."),
            Stop::StepLimit => println!("  Stopped after {max_steps} steps."),
        }
    }
    Ok(())
}

/// Feed `choices` to the engine until it needs input it was not given.
fn play_through(
    engine: &mut NarrativeEngine,
    choices: &[String],
    max_steps: u32,
    mut emit: impl FnMut(&EngineEvent) -> Result<(), String>,
) -> Result<Stop, String> {
    engine.start().map_err(|e| e.to_string())?;
    let mut pending = choices.iter();

    loop {
        for event in engine.drain_events() {
            emit(&event)?;
        }
        engine.skip().map_err(|e| e.to_string())?;
        for event in engine.drain_events() {
            emit(&event)?;
        }

        if engine.step_count() >= max_steps {
            return Ok(Stop::StepLimit);
        }
        let Some(node) = engine.current_node().cloned() else {
            return Err("session has no current node".into());
        };

        if node.is_ending {
            return Ok(Stop::Ending(node.id.to_string()));
        }
        if node.has_choices() {
            let Some(choice) = pending.next() else {
                return Ok(Stop::AwaitingChoice(node.id.to_string()));
            };
            let target = resolve_choice(&node, choice)?;
            engine.choose(&target).map_err(|e| e.to_string())?;
        } else if let Some(auto) = &node.auto_advance {
            engine.update(auto.delay_ms).map_err(|e| e.to_string())?;
        } else if node.next.is_some() {
            engine.advance().map_err(|e| e.to_string())?;
        } else {
            return Ok(Stop::DeadEnd(node.id.to_string()));
        }
    }
}

/// Accept either a target node ID or a 1-based choice number.
fn resolve_choice(node: &Node, choice: &str) -> Result<String, String> {
    if node.has_target(choice) {
        return Ok(choice.to_string());
    }
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| node.choices.get(i))
        .map(|c| c.goto.to_string())
        .ok_or_else(|| format!("\"{choice}\" is not a choice of node \"{}\"", node.id))
}

fn print_event(event: &EngineEvent, json: bool) -> Result<(), String> {
    if json {
        let line =
            serde_json::to_string(event).map_err(|e| format!("JSON serialization error: {e}"))?;
        println!("{line}");
        return Ok(());
    }

    match event {
        EngineEvent::View(view) => {
            println!();
            println!(
                "  {} {}",
                format!("[{}]", view.step_count).dimmed(),
                view.node_id.as_str().bold()
            );
            if let Some(speaker) = &view.speaker_name {
                println!("  {}", speaker.cyan());
            }
            for line in view.full_text.lines() {
                println!("  {line}");
            }
            for (i, choice) in view.choices.iter().enumerate() {
                println!("    {}. {}", i + 1, choice.label);
            }
        }
        EngineEvent::Effect(signal) => println!("  {}", format!("*{}*", signal.effect).yellow()),
        EngineEvent::Restarted => println!("  {}", "(restarted)".dimmed()),
        EngineEvent::Reveal(_) => {}
    }
    Ok(())
}
