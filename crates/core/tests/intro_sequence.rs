use std::cell::RefCell;

use folio_core::{
    intro::RevealPhase, Document, IntroCallbacks, IntroConfig, IntroSequencer, ListenerKind,
    SequentialOrder, Stage, Viewport,
};

const FRAME: f32 = 1.0 / 60.0;

fn run_to<F: FnMut(&mut IntroSequencer)>(
    intro: &mut IntroSequencer,
    callbacks: &mut dyn folio_core::IntroObserver,
    stage: Stage,
    mut each_frame: F,
) {
    let mut frames = 0;
    while intro.stage() != stage {
        intro.tick(FRAME, callbacks);
        each_frame(intro);
        frames += 1;
        assert!(frames < 60 * 60, "intro stuck in {:?}", intro.stage());
    }
}

#[test]
fn default_intro_plays_out_in_order() {
    let events = RefCell::new(Vec::new());
    let mut callbacks = IntroCallbacks {
        on_loading_complete: || events.borrow_mut().push("loading"),
        on_reveal_complete: || events.borrow_mut().push("reveal"),
    };
    let document = Document::new();
    let mut intro = IntroSequencer::seeded(
        IntroConfig::default(),
        Viewport::new(1280.0, 720.0),
        document.clone(),
        42,
    );

    assert_eq!(intro.stage(), Stage::Loading);
    run_to(&mut intro, &mut callbacks, Stage::Revealing, |_| {});

    // Start delay plus progress plus settle.
    assert!(intro.elapsed() > 0.9 + 7.5);
    assert_eq!(intro.indicator().progress(), 100);
    assert!(intro.indicator().is_complete());
    assert_eq!(intro.indicator().label(), "PORTFOLIO");
    assert_eq!(intro.tiles().len(), 13 * 8);
    assert!(intro.layers().preloader);
    assert_eq!(*events.borrow(), vec!["loading"]);

    let mut saw_opaque_grid = false;
    run_to(&mut intro, &mut callbacks, Stage::Ready, |intro| {
        if intro.reveal().map(|reveal| reveal.phase()) == Some(RevealPhase::Holding) {
            saw_opaque_grid |= intro.tiles().iter().all(|tile| tile.opacity == 1.0);
        }
    });

    assert!(saw_opaque_grid);
    assert_eq!(*events.borrow(), vec!["loading", "reveal"]);
    assert!(intro.layers().main_content);
    assert_eq!(document.listener_count(ListenerKind::Resize), 0);

    for _ in 0..600 {
        intro.tick(FRAME, &mut callbacks);
    }
    assert_eq!(events.borrow().len(), 2);
}

#[test]
fn resize_mid_reveal_matches_new_viewport() {
    let completions = RefCell::new(0);
    let mut callbacks = IntroCallbacks {
        on_loading_complete: || {},
        on_reveal_complete: || *completions.borrow_mut() += 1,
    };
    let config = IntroConfig {
        reduced_motion: true,
        ..IntroConfig::default()
    };
    let mut intro = IntroSequencer::new(config, Viewport::new(1280.0, 720.0), Document::new())
        .with_stagger(Box::new(SequentialOrder));

    run_to(&mut intro, &mut callbacks, Stage::Revealing, |_| {});
    for _ in 0..30 {
        intro.tick(FRAME, &mut callbacks);
    }

    for (width, height) in [(1024.0, 768.0), (375.0, 812.0)] {
        intro.resize(Viewport::new(width, height));
        let expected = (width / 100.0_f32).ceil() as usize * (height / 100.0_f32).ceil() as usize;
        assert_eq!(intro.tiles().len(), expected);
        intro.tick(FRAME, &mut callbacks);
    }
    assert_eq!(intro.reveal().map(|reveal| reveal.generation()), Some(2));

    run_to(&mut intro, &mut callbacks, Stage::Ready, |_| {});
    assert_eq!(*completions.borrow(), 1);
    assert_eq!(intro.viewport(), Viewport::new(375.0, 812.0));
}

#[test]
fn resize_outside_reveal_only_records_viewport() {
    let mut intro = IntroSequencer::seeded(
        IntroConfig::default(),
        Viewport::new(800.0, 600.0),
        Document::new(),
        1,
    );
    intro.resize(Viewport::new(400.0, 400.0));

    assert!(intro.reveal().is_none());
    assert_eq!(intro.viewport(), Viewport::new(400.0, 400.0));
}
