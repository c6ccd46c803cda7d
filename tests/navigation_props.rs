use proptest::prelude::*;

use stepwise::host::scripted::{ScriptedAction, ScriptedHost};
use stepwise::{SelectItem, SelectStep, Step, StepResult, run};

const LABELS: [&str; 2] = ["a", "b"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Text,
    Single,
    Multi,
    /// Single select whose items come from a producer on every visit.
    Loaded,
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::Text),
        Just(Kind::Single),
        Just(Kind::Multi),
        Just(Kind::Loaded),
    ]
}

fn action() -> impl Strategy<Value = ScriptedAction> {
    let label = prop::sample::select(vec!["a", "b", "zz"]).prop_map(str::to_string);
    prop_oneof![
        4 => Just(ScriptedAction::Accept),
        2 => Just(ScriptedAction::Back),
        2 => "[a-z]{0,3}".prop_map(ScriptedAction::Type),
        3 => prop::collection::vec(label, 0..3).prop_map(ScriptedAction::Pick),
        1 => Just(ScriptedAction::Hide),
    ]
}

fn items() -> Vec<SelectItem> {
    LABELS.iter().copied().map(SelectItem::new).collect()
}

fn build(kind: Kind, index: usize) -> Step {
    let title = format!("step {index}");
    match kind {
        Kind::Text => Step::text(title),
        Kind::Single => Step::select(title, items()),
        Kind::Multi => SelectStep::new(title, items()).with_can_select_many(true).into(),
        Kind::Loaded => SelectStep::with_producer(title, || async { items() }).into(),
    }
}

/// One step's slot as the runner should see it.
#[derive(Debug, Clone)]
enum Slot {
    Text(Option<String>),
    Selection(Vec<String>),
}

struct Expected {
    results: Option<Vec<StepResult>>,
    visits: usize,
}

fn into_results(slots: Vec<Slot>) -> Vec<StepResult> {
    slots
        .into_iter()
        .map(|slot| match slot {
            Slot::Text(value) => StepResult::Text(value),
            Slot::Selection(labels) => {
                StepResult::Selection(labels.into_iter().map(SelectItem::new).collect())
            }
        })
        .collect()
}

/// Selection a select view starts a visit with.
fn entry_selection(slot: &Slot) -> Vec<String> {
    match slot {
        Slot::Selection(labels) => labels.clone(),
        Slot::Text(_) => Vec::new(),
    }
}

/// Mirrors the runner against the scripted host for the kinds above.
fn simulate(kinds: &[Kind], actions: &[ScriptedAction]) -> Expected {
    let mut slots: Vec<Slot> = kinds
        .iter()
        .map(|kind| match kind {
            Kind::Text => Slot::Text(None),
            _ => Slot::Selection(Vec::new()),
        })
        .collect();
    let mut cursor = 1;
    let mut visits = 1;
    // Selection held by the live select view.
    let mut shown = entry_selection(&slots[0]);

    for action in actions {
        match action {
            ScriptedAction::Hide => {
                return Expected {
                    results: None,
                    visits,
                };
            }
            ScriptedAction::Back => {
                if cursor > 1 {
                    cursor -= 1;
                    visits += 1;
                    shown = entry_selection(&slots[cursor - 1]);
                }
                continue;
            }
            _ => {}
        }

        let kind = kinds[cursor - 1];
        let accepted = match (action, &mut slots[cursor - 1]) {
            (ScriptedAction::Type(text), Slot::Text(value)) => {
                *value = Some(text.clone());
                false
            }
            (ScriptedAction::Accept, Slot::Text(value)) => {
                if value.is_none() {
                    *value = Some(String::new());
                }
                true
            }
            (ScriptedAction::Pick(wanted), Slot::Selection(_)) => {
                shown = LABELS
                    .iter()
                    .filter(|label| wanted.iter().any(|w| w.as_str() == **label))
                    .map(|label| label.to_string())
                    .collect();
                if kind != Kind::Multi {
                    shown.truncate(1);
                }
                false
            }
            (ScriptedAction::Accept, Slot::Selection(selected)) => {
                if shown.is_empty() && kind != Kind::Multi {
                    shown = selected.iter().take(1).cloned().collect();
                }
                if shown.is_empty() {
                    false
                } else {
                    *selected = shown.clone();
                    true
                }
            }
            _ => false,
        };

        if accepted {
            if cursor == kinds.len() {
                return Expected {
                    results: Some(into_results(slots)),
                    visits,
                };
            }
            cursor += 1;
            visits += 1;
            shown = entry_selection(&slots[cursor - 1]);
        }
    }

    Expected {
        results: None,
        visits,
    }
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("runtime")
        .block_on(future)
}

proptest! {
    #[test]
    fn runner_matches_navigation_model(
        kinds in prop::collection::vec(kind(), 1..5),
        actions in prop::collection::vec(action(), 0..32),
    ) {
        let expected = simulate(&kinds, &actions);

        let mut host = ScriptedHost::new(actions);
        let log = host.log();
        let mut steps: Vec<Step> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| build(*kind, i + 1))
            .collect();

        let results = block_on(run(&mut host, &mut steps)).expect("no defect");

        prop_assert_eq!(results, expected.results);
        prop_assert_eq!(log.created(), expected.visits);
        prop_assert!(log.max_live() <= 1);
        prop_assert_eq!(log.live(), 0);

        for record in log.records() {
            prop_assert!(!record.busy);
        }
    }

    #[test]
    fn indicator_and_back_follow_the_cursor(
        kinds in prop::collection::vec(kind(), 2..6),
        forward in 1usize..6,
    ) {
        let forward = forward.min(kinds.len());
        let mut actions = Vec::new();
        for kind in &kinds[..forward] {
            if *kind != Kind::Text {
                actions.push(ScriptedAction::Pick(vec!["a".to_string()]));
            }
            actions.push(ScriptedAction::Accept);
        }
        actions.push(ScriptedAction::Hide);

        let mut host = ScriptedHost::new(actions);
        let log = host.log();
        let mut steps: Vec<Step> = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| build(*kind, i + 1))
            .collect();
        let _ = block_on(run(&mut host, &mut steps)).expect("no defect");

        let total = kinds.len();
        for (i, record) in log.records().iter().enumerate() {
            let step = i + 1;
            prop_assert_eq!(record.indicator.is_some(), step > 1);
            prop_assert_eq!(record.buttons.is_empty(), step == 1);
            prop_assert_eq!(record.busy_seen, kinds[i] == Kind::Loaded);
            if let Some(indicator) = record.indicator {
                prop_assert_eq!(indicator.step, step);
                prop_assert_eq!(indicator.total, total);
            }
        }
    }
}
