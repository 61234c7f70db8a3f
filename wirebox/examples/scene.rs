//! A small scene graph resolved top-down with Wirebox.

use std::sync::Arc;

use wirebox::prelude::*;
use wirebox::{Injectable, Provider};

// === Shared services ===

trait Logger: Send + Sync {
    fn log(&self, msg: &str);
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, msg: &str) {
        println!("[LOG] {msg}");
    }
}

struct Clock {
    fps: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Viewport {
    width: u32,
    height: u32,
}

// === Scene nodes ===

#[derive(Default, Injectable)]
struct Drawable {
    #[resolved]
    logger: Option<Arc<dyn Logger>>,
    #[resolved(property, setter = "private")]
    clock: Option<Arc<Clock>>,
}

impl Drawable {
    fn draw(&self, what: &str) {
        let fps = self.clock.as_ref().map_or(0, |clock| clock.fps);
        if let Some(logger) = &self.logger {
            logger.log(&format!("Drawing {what} at {fps} fps"));
        }
    }
}

#[derive(Default, Injectable)]
struct Sprite {
    #[resolved(base)]
    drawable: Drawable,
    #[resolved(permit_missing)]
    viewport: Viewport,
    #[resolved(permit_missing)]
    tint: Option<u32>,
}

/// A container node: resolved like any other node, then publishes the
/// viewport its children lay out against.
#[derive(Injectable, Provider)]
struct Panel {
    #[resolved]
    logger: Option<Arc<dyn Logger>>,
    #[cached]
    viewport: Viewport,
    #[cached]
    tint: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("wirebox_container=debug")
        .init();

    // Root store: services shared by the whole scene
    let root = Arc::new(DependencyStore::new());
    root.cache(Arc::new(ConsoleLogger) as Arc<dyn Logger>);
    root.cache(Arc::new(Clock { fps: 60 }));

    let injector = Injector::new();
    println!("{}", injector.plan_for::<Sprite>()?.render());

    // The panel resolves from the root and derives the store for its children
    let mut panel = Panel {
        logger: None,
        viewport: Viewport { width: 320, height: 240 },
        tint: Some(0x00ff_8800),
    };
    let panel_store = Arc::new(injector.inject_and_compose(&mut panel, &root)?);
    if let Some(logger) = &panel.logger {
        logger.log("Panel resolved");
    }

    let mut inside = Sprite::default();
    injector.inject(&mut inside, &panel_store)?;
    inside.drawable.draw("sprite inside panel");
    println!("  viewport = {:?}, tint = {:?}", inside.viewport, inside.tint);

    // A sprite resolved from the root sees no viewport and falls back to defaults
    let mut outside = Sprite::default();
    resolve(&mut outside, &root)?;
    outside.drawable.draw("sprite outside panel");
    println!("  viewport = {:?}, tint = {:?}", outside.viewport, outside.tint);

    Ok(())
}
