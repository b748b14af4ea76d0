use std::path::Path;

use gantry_core::kernel::{Application, KindRegistry, Result};

fn load(manifest: &Path) -> Result<Application> {
    Application::from_path(manifest, &KindRegistry::with_builtin_kinds())
}

/// Print the start order, or the stop order with `reverse`, one key per line.
pub fn order(manifest: &Path, reverse: bool) -> Result<()> {
    let app = load(manifest)?;
    let keys = if reverse {
        app.stop_order()?
    } else {
        app.start_order()?
    };
    for key in keys {
        println!("{}", key);
    }
    Ok(())
}

/// Validate a manifest's wiring without starting anything.
pub fn check(manifest: &Path) -> Result<()> {
    let app = load(manifest)?;
    app.validate()?;
    println!(
        "System '{}' is valid ({} components)",
        app.name(),
        app.keys().len()
    );
    Ok(())
}

/// Start the system, then stop it, printing each component the step invoked.
pub async fn run(manifest: &Path) -> Result<()> {
    let mut app = load(manifest)?;

    for key in app.start().await? {
        println!("started {}", key);
    }
    for key in app.stop().await? {
        println!("stopped {}", key);
    }
    Ok(())
}
