//! tetrachip CLI: live playback and WAV export of patch files.
//!
//! Usage:
//!   tc-cli                          play the built-in demo
//!   tc-cli patch.json               play a patch
//!   tc-cli patch.json --wav out.wav render to WAV instead
//!   tc-cli --status                 print channel state after rendering
//!   tc-cli --dump-demo              print the demo patch as JSON

#[cfg(feature = "alloc_check")]
#[global_allocator]
static A: assert_no_alloc::AllocDisabler = assert_no_alloc::AllocDisabler;

use log::{error, info};
use simplelog::TermLogger;
use std::io::Write;
use std::{env, fs};
use tc_master::{Controller, Patch};

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = TermLogger::init(
        log::LevelFilter::Info,
        simplelog::ConfigBuilder::new()
            .set_time_level(log::LevelFilter::Trace)
            .build(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    ) {
        eprintln!("Failed to start logger: {}", e);
    }

    if args.iter().any(|a| a == "--dump-demo") {
        match Patch::demo().to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => fail(&format!("Failed to encode demo patch: {}", e)),
        }
        return;
    }

    let wav_path = args
        .iter()
        .position(|a| a == "--wav")
        .and_then(|i| args.get(i + 1))
        .cloned();
    let show_status = args.iter().any(|a| a == "--status");
    let patch_path = args
        .iter()
        .enumerate()
        .find(|(i, a)| !a.starts_with("--") && (*i == 0 || args[*i - 1] != "--wav"))
        .map(|(_, a)| a.clone());

    let patch = match &patch_path {
        Some(path) => Patch::load(path).unwrap_or_else(|e| fail(&format!("Failed to load {}: {}", path, e))),
        None => Patch::demo(),
    };

    info!(
        "{}: {} ms at {} Hz, {} channel setups, {} events",
        patch_path.as_deref().unwrap_or("demo"),
        patch.length_ms,
        patch.sample_rate,
        patch.channels.len(),
        patch.events.len()
    );

    let mut ctrl = Controller::new(patch);

    if wav_path.is_some() || show_status {
        render(&ctrl, wav_path.as_deref(), show_status);
    } else {
        play_audio(&mut ctrl);
    }
}

fn fail(message: &str) -> ! {
    error!("{}", message);
    std::process::exit(1);
}

fn play_audio(ctrl: &mut Controller) {
    if let Err(e) = ctrl.play() {
        fail(&format!("Playback failed: {}", e));
    }
    println!("Playing...");

    while ctrl.is_playing() {
        if let Some(pos) = ctrl.position() {
            print!("\rSample: {:>9}", pos);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    println!("\rDone.              ");
}

fn render(ctrl: &Controller, wav_path: Option<&str>, show_status: bool) {
    let render = ctrl.render();
    info!("Rendered {} samples at {} Hz", render.samples.len(), render.sample_rate);

    if let Some(path) = wav_path {
        let wav = tc_master::samples_to_wav(&render.samples, render.sample_rate);
        fs::write(path, &wav).unwrap_or_else(|e| fail(&format!("Failed to write {}: {}", path, e)));
        info!("Wrote {} bytes to {}", wav.len(), path);
    }

    if show_status {
        for status in &render.status {
            print!("{}", status);
        }
    }
}
