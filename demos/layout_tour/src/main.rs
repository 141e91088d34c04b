//! Headless walk through the layouts: builds a settings panel, feeds it a
//! few pointer events and prints the resulting geometry.
//!
//! Run with `RUST_LOG=debug` to see the tree dump and popup traffic.

use std::sync::Arc;

use parking_lot::Mutex;
use trellis_core::*;
use trellis_devtools::{Inspector, count_nodes, log_tree};
use trellis_ui::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let measure: Arc<dyn TextMeasure> = Arc::new(FixedMeasure::default());
    let mut b = Builder::new(measure.clone());
    let volume = Arc::new(Mutex::new(0.5f32));

    let mut slider = None;
    let root = b.splitter(Axis::Horizontal, |b| {
        b.scroll(|b| {
            for i in 0..12 {
                b.button(format!("Item {i}"), move || log::info!("item {i} clicked"));
            }
        });
        b.group(|b| {
            let (_, s) = b.labeled("Volume", Slider::new(0.5, 0.0, 1.0).with_step(0.1));
            s.lock().slot().bind(volume.clone());
            slider = Some(s);
            b.labeled("Muted", Checkbox::new(false));
            let m = b.measure();
            b.labeled("Gain (dB)", NumberBox::new(0.0, -24.0, 24.0, m));
        });
    });

    let mut screen = Screen::new(&root, Size::new(480.0, 240.0));
    screen.layout();

    let panes = root.lock().list().snapshot();
    for c in &panes {
        let r = c.lock().node().rect();
        println!("pane {}: {:?}", c.id(), r);
    }

    // drag the seam 40px to the right
    if let Some(first) = panes.first() {
        let seam = first.lock().node().rect().right() + 1.0;
        screen.handle(&InputEvent::press(Vec2::new(seam, 120.0)));
        screen.handle(&InputEvent::drag(Vec2::new(seam + 40.0, 120.0)));
        screen.handle(&InputEvent::release(Vec2::new(seam + 40.0, 120.0)));
        screen.layout();
        println!("after drag: {:?}", first.lock().node().rect());
    }

    if let Some(s) = &slider {
        s.lock().set_value(0.8);
    }
    println!("volume: {}", volume.lock());

    let menu = PopupMenu::new(
        vec![
            MenuItem::new("Copy", 1),
            MenuItem::new("Paste", 2),
            MenuItem::separator(),
            MenuItem::submenu("More", vec![MenuItem::new("Select all", 3)]),
        ],
        measure,
    )
    .on_select(|p| println!("menu picked {p}"));
    let at = Vec2::new(60.0, 40.0);
    screen.popups_mut().show_with(
        NodeRef::new(menu),
        at,
        Some(Box::new(|r| println!("menu closed: {r:?}"))),
    );
    let mut inspector = Inspector::new();
    inspector.hud.toggle_inspector();
    inspector.timed_layout(|| screen.layout());
    screen.handle(&InputEvent::moved(at + Vec2::new(10.0, 10.0)));
    screen.handle(&InputEvent::release(at + Vec2::new(10.0, 10.0)));

    let mut scene = screen.draw();
    inspector.frame(&mut scene, screen.root(), screen.hovered());
    if let Some(stats) = &inspector.hud.stats {
        println!("layout took {:.3} ms", stats.layout_ms);
    }
    println!(
        "{} nodes, {} scene items",
        count_nodes(screen.root()),
        scene.nodes.len()
    );
    log_tree(screen.root());
    Ok(())
}
