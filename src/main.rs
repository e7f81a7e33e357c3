//! Maya Visuals entry point
//!
//! The browser build is driven from JS through `maya_visuals::web`. The native
//! binary plays a scripted answer session headlessly and logs what happens.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let theme = std::env::args().nth(1).unwrap_or_else(|| "jellyfish".to_string());
    log::info!("Maya Visuals (native) starting with theme '{}'", theme);
    log::info!("Native mode is headless - serve the wasm build for the animated version");

    run_session(&theme);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is maya_visuals::web::start, this is just to satisfy the compiler
}

/// Twenty correct answers, a stumble, then a penalty reset
#[cfg(not(target_arch = "wasm32"))]
fn run_session(theme: &str) {
    use maya_visuals::VisualManager;
    use maya_visuals::sim::Viewport;

    const FRAME_MS: f64 = 1000.0 / 60.0;

    let mut manager = VisualManager::default();
    manager.set_viewport(Viewport::new(1280.0, 800.0));
    manager.initialize(theme);

    let mut now = 0.0;
    let mut play = |manager: &mut VisualManager, frames: u32| {
        for _ in 0..frames {
            now += FRAME_MS;
            if !manager.frame(now) {
                break;
            }
        }
    };

    let script = std::iter::repeat_n('c', 20).chain("ws".chars()).chain(std::iter::repeat_n('w', 3));
    for answer in script {
        match answer {
            'c' => manager.on_correct(),
            'w' => manager.on_wrong(),
            _ => manager.on_skip(),
        }
        // About two seconds between answers lets cascades and fades finish
        play(&mut manager, 120);

        let hint = manager.hint();
        let counts = manager.counts();
        let (live, colored) = manager
            .theme()
            .map(|t| (t.len(), t.sets().filter(|s| s.is_colored()).count()))
            .unwrap_or_default();
        println!(
            "{answer} c={:>2} w={} s={} | {:<10} | live={:>2} colored={:>2} | {} - {} ({:.0}%)",
            counts.correct,
            counts.wrong,
            counts.skip,
            manager.tier().as_str(),
            live,
            colored,
            hint.message,
            hint.description,
            hint.progress * 100.0
        );
    }
}
