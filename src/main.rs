use clap::Parser;
use dotmatrix::{ErrorSink, Framebuffer, TextOption};
use rand::Rng;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;

fn main() -> anyhow::Result<()> {
    let args = cli::CliOpts::parse();
    init_logger(&args);

    let sink = ErrorSink::new();
    let mut fb = Framebuffer::new(args.width, args.height, sink)?;

    match &args.command {
        cli::Command::Bricks => fb.draw_bricks(),
        cli::Command::Line(opts) => fb.draw_line(opts.from.x, opts.from.y, opts.to.x, opts.to.y, true),
        cli::Command::Circle(opts) => fb.draw_circle(opts.xc, opts.yc, opts.radius),
        cli::Command::Text(opts) => {
            let mut text_options = Vec::new();
            if let Some(path) = &opts.font_file {
                text_options.push(TextOption::FontFile(path.clone()));
            }
            if opts.rotate_font != 0 {
                text_options.push(TextOption::RotateFont(opts.rotate_font));
            }
            if opts.rotate_pixel != 0 {
                text_options.push(TextOption::RotatePixel(opts.rotate_pixel));
            }
            let rendered = fb.draw_text_extra(
                &opts.text,
                opts.at.x,
                opts.at.y,
                opts.face,
                opts.size,
                &text_options,
            )?;
            tracing::info!("rendered {} of {} characters", rendered, opts.text.chars().count());
        }
        cli::Command::Noise(opts) => {
            let mut rng = rand::thread_rng();
            let (w, h) = fb.get_size();
            for _ in 0..opts.count {
                let x = rng.gen_range(0..w);
                let y = rng.gen_range(0..h);
                let _ = fb.set_pixel(x, y, true);
            }
        }
    }

    if args.hex {
        println!("{}", fb.hexdump());
    } else {
        println!("{}", fb.bitdump());
    }
    Ok(())
}

/// Initialize the tracing subscriber at a level derived from the -v/-q flags
fn init_logger(args: &cli::CliOpts) {
    let default_level = match args.verbose as i8 - args.quiet as i8 {
        i8::MIN..=-2 => "error",
        -1 => "warn",
        0 => "info",
        1 => "debug",
        2..=i8::MAX => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(default_level.parse().unwrap())
                .from_env_lossy(),
        )
        .init();
}
