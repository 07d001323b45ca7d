pub mod dialog;
pub mod input;
pub mod render;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures::{ FutureExt, StreamExt };
use log::{ debug, info };
use std::error::Error;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout };
use tokio::sync::mpsc;
use crate::dashboard::{ Dashboard, Key, MountedDashboard };
use self::dialog::PendingConfirmation;
use self::input::{ parse_answer, parse_command, Command, HELP };
use self::render::{ render, Layout };

async fn execute(dashboard: Dashboard, command: Command) {
    // Failures are logged and surfaced as notices by the dashboard itself.
    let _ = match command {
        Command::New => dashboard.create().await.map(|_| ()),
        Command::Open(id) => dashboard.select(id).await.map(|_| ()),
        Command::Delete(id) => dashboard.delete(id).await.map(|_| ()),
        Command::Menu => {
            dashboard.toggle_list().await;
            Ok(())
        }
        Command::Say(text) => {
            dashboard.update_draft(text).await;
            dashboard.submit_on_enter(Key::Enter).await.map(|_| ())
        }
        Command::Help | Command::Quit => Ok(()),
    };
}

async fn print(stdout: &mut Stdout, text: &str) -> std::io::Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n").await?;
    }
    stdout.flush().await
}

async fn redraw(
    stdout: &mut Stdout,
    dashboard: &Dashboard,
    clock: &str,
    layout: Layout
) -> std::io::Result<()> {
    let state = dashboard.snapshot().await;
    let mut frame = render(&state, clock, layout);
    for notice in dashboard.take_notices().await {
        frame.push_str(&format!("{}\n", notice));
    }
    print(stdout, &frame).await
}

/// Runs the interactive terminal until `/quit` or end of input, then unmounts.
pub async fn run(
    mounted: MountedDashboard,
    mut confirmations: mpsc::Receiver<PendingConfirmation>,
    layout: Layout
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let dashboard = mounted.dashboard().clone();
    let mut changes = dashboard.subscribe();
    let mut clock = mounted.clock();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut pending: Option<PendingConfirmation> = None;
    let mut inflight: FuturesUnordered<BoxFuture<'static, ()>> = FuturesUnordered::new();

    let now = clock.borrow().clone();
    redraw(&mut stdout, &dashboard, &now, layout).await?;
    print(&mut stdout, "Type /help for commands.").await?;

    loop {
        tokio::select! {
            // In-flight commands run first so each one takes its draft before the next line is read.
            biased;

            Some(()) = inflight.next(), if !inflight.is_empty() => {}

            Some(request) = confirmations.recv(), if pending.is_none() => {
                let prompt = format!(
                    "{} [{}/{}]",
                    request.prompt.title,
                    request.prompt.confirm_label,
                    request.prompt.cancel_label
                );
                print(&mut stdout, &prompt).await?;
                pending = Some(request);
            }

            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = clock.borrow().clone();
                redraw(&mut stdout, &dashboard, &now, layout).await?;
            }

            changed = clock.changed() => {
                if changed.is_err() {
                    break;
                }
                let now = clock.borrow_and_update().clone();
                redraw(&mut stdout, &dashboard, &now, layout).await?;
            }

            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("End of input");
                    break;
                };

                if let Some(request) = pending.take() {
                    let _ = request.reply.send(parse_answer(&line));
                    continue;
                }

                match parse_command(&line) {
                    Ok(Command::Quit) => break,
                    Ok(Command::Help) => print(&mut stdout, HELP).await?,
                    Ok(command) => inflight.push(execute(dashboard.clone(), command).boxed()),
                    Err(message) => print(&mut stdout, &message).await?,
                }
            }
        }
    }

    info!("Leaving dashboard");
    mounted.unmount();
    Ok(())
}
