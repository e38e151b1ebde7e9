//! The bundled demo chapter: a library, a glowing diary, and a trip fifty
//! years into the past.

use crate::error::ScriptResult;
use crate::graph::ScriptGraph;
use crate::raw::RawScript;

/// JSON source of the demo chapter.
pub const DEMO_SCRIPT: &str = r#"{
  "chapter": "Chapter 1 - The Library Diary",
  "startNode": "start",
  "nodes": {
    "start": {
      "id": "start",
      "bg": "library_modern",
      "char": "protagonist",
      "name": "You",
      "text": "While sorting old records in the library, you come across a yellowed diary. When you open it, a faint light seeps from between the pages.",
      "choices": [
        { "text": "Read the diary closely", "goto": "before_travel" },
        { "text": "Put it back and leave the library", "goto": "ending_normal" }
      ]
    },
    "before_travel": {
      "id": "before_travel",
      "bg": "transition",
      "char": "protagonist",
      "name": "You",
      "text": "You turn the pages and the light grows stronger...",
      "choices": [],
      "autoAdvance": { "delayMs": 200, "effect": "flash", "goto": "first_travel" }
    },
    "first_travel": {
      "id": "first_travel",
      "bg": "old_school",
      "char": "liuxue",
      "name": "Liu Xue",
      "text": "A flash, and you are swept fifty years back to the old teachers' college.\nOld classroom buildings and a dusty field surround you. A girl named Liu Xue walks over, as if she recognizes you.",
      "choices": [
        { "text": "Say hello to Liu Xue", "goto": "interaction_liuxue" },
        { "text": "Look around first", "goto": "interaction_liuxue" }
      ]
    },
    "interaction_liuxue": {
      "id": "interaction_liuxue",
      "bg": "old_school",
      "char": "liuxue",
      "name": "Liu Xue",
      "text": "Liu Xue is curious about the modern world. 'Did you come from the future?' You explain what happened, and she begins to believe you, hinting that the two of you will explore the secret of time together.",
      "choices": [
        { "text": "Try to return to the present", "goto": "time_experiment" },
        { "text": "Stay and keep watching", "goto": "time_experiment" }
      ]
    },
    "time_experiment": {
      "id": "time_experiment",
      "bg": "library_modern",
      "char": "protagonist",
      "name": "You",
      "text": "You and Liu Xue experiment with crossing time, moving back and forth between the modern school and the college of fifty years ago. Your actions might change the school's history. Liu Xue says she trusts you.",
      "choices": [
        { "text": "End the experiment and go home", "goto": "ending_open" },
        { "text": "Keep exploring the unknown", "goto": "ending_open" }
      ]
    },
    "ending_normal": {
      "id": "ending_normal",
      "bg": "library_modern",
      "char": "protagonist",
      "name": "You",
      "text": "You ignore the diary and life goes on as usual, though a small question stays with you.\n(Quiet Ending)",
      "choices": [],
      "isEnding": true
    },
    "ending_open": {
      "id": "ending_open",
      "bg": "campus_modern",
      "char": "liuxue",
      "name": "Liu Xue",
      "text": "Back on the modern campus, you and Liu Xue say goodbye on the field. You both know this strange journey has only just begun.\n(Open Ending)",
      "choices": [],
      "isEnding": true
    }
  }
}
"#;

/// The demo chapter in authoring form.
pub fn raw_script() -> serde_json::Result<RawScript> {
    RawScript::from_json(DEMO_SCRIPT)
}

/// The demo chapter as a validated graph.
pub fn script() -> ScriptResult<ScriptGraph> {
    ScriptGraph::from_json(DEMO_SCRIPT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_loads_and_is_fully_reachable() {
        let graph = script().unwrap();
        assert_eq!(graph.node_count(), 7);
        assert_eq!(graph.start_id().as_str(), "start");
        assert!(graph.unreachable().is_empty());
    }

    #[test]
    fn demo_transition_uses_flash() {
        let graph = script().unwrap();
        let node = graph.get("before_travel").unwrap();
        let auto = node.auto_advance.as_ref().unwrap();
        assert_eq!(auto.delay_ms, 200);
        assert_eq!(auto.effect.as_deref(), Some("flash"));
        assert_eq!(auto.goto.as_str(), "first_travel");
    }

    #[test]
    fn demo_raw_matches_graph() {
        assert_eq!(raw_script().unwrap().nodes.len(), script().unwrap().node_count());
    }
}
