//! Render lifecycle: placeholder, success, failure and last-input-wins

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{svg_for, GatedService, ScriptedService};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use proptest::prelude::*;
use visualmaker::prelude::*;
use visualmaker::PLACEHOLDER_TEXT;

fn scripted() -> DiagramRenderer<ScriptedService> {
    DiagramRenderer::new(ScriptedService::default(), MemorySurface::new(), &RenderOptions::default())
        .unwrap()
}

fn gated() -> Rc<DiagramRenderer<GatedService>> {
    Rc::new(
        DiagramRenderer::new(GatedService::default(), MemorySurface::new(), &RenderOptions::default())
            .unwrap(),
    )
}

#[test]
fn test_empty_input_shows_placeholder() {
    let renderer = scripted();
    let outcome = block_on(renderer.update("", "flowchart"));

    assert_eq!(outcome, RenderOutcome::Idle);
    assert!(renderer.preview().is_placeholder());
    assert_eq!(renderer.error(), None);
    assert!(renderer.service().calls.borrow().is_empty());
    assert_eq!(PLACEHOLDER_TEXT, "Enter Mermaid syntax to preview diagram");
}

#[test]
fn test_valid_input_shows_graphics() {
    let renderer = scripted();
    let outcome = block_on(renderer.update("graph TD; A-->B", "flowchart"));

    assert_eq!(outcome, RenderOutcome::Rendered);
    let graphics = renderer.preview().graphics().cloned().unwrap();
    assert!(graphics.as_str().contains(r#"id="visualmaker-1""#));
    assert_eq!(renderer.with_surface(|s| s.current().clone()), Preview::Graphics(graphics));
    assert_eq!(renderer.error(), None);
}

#[test]
fn test_invalid_input_shows_error_and_clears_surface() {
    let renderer = scripted();
    block_on(renderer.update("graph TD; A-->B", "flowchart"));
    let outcome = block_on(renderer.update("invalid @@@", "flowchart"));

    assert_eq!(outcome, RenderOutcome::Failed("Parse error on line 1".to_string()));
    assert_eq!(renderer.error().as_deref(), Some("Parse error on line 1"));
    assert_eq!(renderer.preview(), Preview::Blank);
    assert_eq!(renderer.with_surface(|s| s.current().clone()), Preview::Blank);
}

#[test]
fn test_next_change_clears_error() {
    let renderer = scripted();
    block_on(renderer.update("invalid", "flowchart"));
    assert!(renderer.error().is_some());

    let request = renderer.begin("graph LR; X", "flowchart");
    assert!(request.is_some());
    assert_eq!(renderer.error(), None);

    block_on(renderer.update("invalid", "flowchart"));
    block_on(renderer.update("", "flowchart"));
    assert_eq!(renderer.error(), None);
}

#[test]
fn test_newer_result_wins_when_older_resolves_last() {
    let renderer = scripted();
    let first = renderer.begin("graph TD; A", "flowchart").unwrap();
    let second = renderer.begin("graph TD; A-->B", "flowchart").unwrap();

    assert_eq!(block_on(renderer.complete(second)), RenderOutcome::Rendered);
    let shown = renderer.preview();
    assert_eq!(block_on(renderer.complete(first)), RenderOutcome::Superseded);
    assert_eq!(renderer.preview(), shown);
    assert!(shown.graphics().unwrap().as_str().contains("visualmaker-2"));
}

#[test]
fn test_stale_failure_does_not_populate_error() {
    let renderer = scripted();
    let stale = renderer.begin("invalid", "flowchart").unwrap();
    let current = renderer.begin("graph TD; A", "flowchart").unwrap();

    block_on(renderer.complete(current));
    assert_eq!(block_on(renderer.complete(stale)), RenderOutcome::Superseded);
    assert_eq!(renderer.error(), None);
    assert!(renderer.preview().graphics().is_some());
}

#[test]
fn test_out_of_order_resolution_on_one_task() {
    let renderer = gated();
    let release_d1 = renderer.service().gate("D1");
    let release_d2 = renderer.service().gate("D2");
    let outcomes = Rc::new(RefCell::new(Vec::new()));

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    for definition in ["D1", "D2"] {
        let request = renderer.begin(definition, "flowchart").unwrap();
        let renderer = Rc::clone(&renderer);
        let outcomes = Rc::clone(&outcomes);
        spawner
            .spawn_local(async move {
                let id = request.id();
                let outcome = renderer.complete(request).await;
                outcomes.borrow_mut().push((id.sequence(), outcome));
            })
            .unwrap();
    }

    pool.run_until_stalled();
    assert!(renderer.is_pending());
    assert_eq!(renderer.preview(), Preview::Blank);

    let d2_id = renderer.last_id().unwrap();
    release_d2.send(Ok(svg_for(&d2_id, "D2"))).unwrap();
    pool.run_until_stalled();
    let after_d2 = renderer.preview();
    assert!(after_d2.graphics().is_some());

    release_d1.send(Ok(r#"<svg id="stale"/>"#.to_string())).unwrap();
    pool.run();

    assert_eq!(renderer.preview(), after_d2);
    assert_eq!(
        *outcomes.borrow(),
        vec![(2, RenderOutcome::Rendered), (1, RenderOutcome::Superseded)]
    );
}

#[test]
fn test_blank_input_while_pending_keeps_placeholder() {
    let renderer = gated();
    let release = renderer.service().gate("graph TD; A");
    let request = renderer.begin("graph TD; A", "flowchart").unwrap();

    let mut pool = LocalPool::new();
    let completion = {
        let renderer = Rc::clone(&renderer);
        pool.spawner()
            .spawn_local_with_handle(async move { renderer.complete(request).await })
            .unwrap()
    };
    pool.run_until_stalled();

    assert!(renderer.begin("", "flowchart").is_none());
    release.send(Ok(r#"<svg/>"#.to_string())).unwrap();
    let outcome = pool.run_until(completion);

    assert_eq!(outcome, RenderOutcome::Superseded);
    assert!(renderer.preview().is_placeholder());
}

proptest! {
    #[test]
    fn prop_whitespace_never_reaches_service(input in "[ \t\r\n]{0,24}") {
        let renderer = scripted();
        let outcome = block_on(renderer.update(&input, "flowchart"));
        prop_assert_eq!(outcome, RenderOutcome::Idle);
        prop_assert!(renderer.preview().is_placeholder());
        prop_assert!(renderer.service().calls.borrow().is_empty());
        prop_assert_eq!(renderer.last_id(), None);
    }

    #[test]
    fn prop_only_last_request_applies(count in 2usize..8, winner_first in any::<bool>()) {
        let renderer = scripted();
        let requests: Vec<_> = (0..count)
            .map(|i| renderer.begin(&format!("graph TD; N{i}"), "flowchart").unwrap())
            .collect();
        let last_id = requests[count - 1].id();

        let mut order = requests;
        if winner_first {
            order.rotate_right(1);
        }
        let mut rendered = 0;
        for request in order {
            if block_on(renderer.complete(request)) == RenderOutcome::Rendered {
                rendered += 1;
            }
        }

        prop_assert_eq!(rendered, 1);
        let shown = renderer.preview().graphics().cloned().unwrap();
        let expected_marker = format!("id=\"{}\"", last_id);
        prop_assert!(shown.as_str().contains(&expected_marker));
    }
}
