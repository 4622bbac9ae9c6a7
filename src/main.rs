use std::env;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use log::{info, warn};
use rand::Rng;

use radial_gauge::{
    compose, load_props, GaugeCommand, GaugeConfig, GaugeProps, GaugeWindow, Threshold,
};

const USAGE: &str = "usage: radial-gauge [--config FILE] [--svg OUT] [--font FILE] [--title TEXT] [--demo]";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut config_path = None;
    let mut svg_path = None;
    let mut font_path = None;
    let mut title = "Gauge".to_string();
    let mut demo = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => config_path = args.next(),
            "--svg" => svg_path = args.next(),
            "--font" => font_path = args.next(),
            "--title" => {
                if let Some(text) = args.next() {
                    title = text;
                }
            }
            "--demo" => demo = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                return Ok(());
            }
            other => {
                eprintln!("unknown argument {other:?}\n{USAGE}");
                std::process::exit(2);
            }
        }
    }

    let props = match config_path {
        Some(path) => load_props(path)?,
        None => GaugeProps::builder()
            .value(0.0)
            .max(100.0)
            .show_threshold_ticks(true)
            .build(),
    };

    let config = GaugeConfig::resolve(&props)?;
    if let Some(path) = svg_path {
        std::fs::write(&path, compose(&config, props.value).to_svg())?;
        info!("wrote {path}");
        return Ok(());
    }

    let mut window = GaugeWindow::new(props).with_title(title);
    if let Some(path) = font_path {
        window = window.with_font_data(std::fs::read(path)?)?;
    }

    let (sender, receiver) = mpsc::channel();
    if demo {
        let (min, max) = (config.domain.min(), config.domain.max());
        thread::spawn(move || {
            let mut rng = rand::rng();
            loop {
                let commands = [
                    GaugeCommand::SetValue(rng.random_range(min..max)),
                    GaugeCommand::SetReferenceThresholds(vec![
                        Threshold::new(rng.random_range(min..max), "gainsboro"),
                        Threshold::new(max, "darkgray"),
                    ]),
                ];
                if commands.into_iter().any(|cmd| sender.send(cmd).is_err()) {
                    break;
                }
                thread::sleep(Duration::from_millis(1500));
            }
        });
    } else {
        thread::spawn(move || {
            for line in io::stdin().lock().lines().map_while(Result::ok) {
                match line.trim().parse::<f64>() {
                    Ok(value) => {
                        if sender.send(GaugeCommand::SetValue(value)).is_err() {
                            break;
                        }
                    }
                    Err(_) if line.trim().is_empty() => {}
                    Err(e) => warn!("ignoring {line:?}: {e}"),
                }
            }
        });
    }

    window.show_with_commands(receiver)?;
    Ok(())
}
