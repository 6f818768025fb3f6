use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use crate::game::{FinalTally, Game, Phase};
use crate::geometry::Point;
use crate::imagery::Rgb;
use crate::inout::RoundRecord;
use crate::loader::{ImagePool, Loader};
use crate::prefs::{Prefs, Theme};

/// What the session produced, for the data file and the exit recap.
pub struct Outcome {
    pub records: Vec<RoundRecord>,
    pub tally: Option<FinalTally>,
    pub warnings: Vec<String>,
}

struct Palette {
    text: Color,
    dim: Color,
    panel: Color,
    accent: Color,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Dark => Palette {
            text: Color::Rgb {
                r: 235,
                g: 235,
                b: 235,
            },
            dim: Color::Rgb {
                r: 130,
                g: 130,
                b: 130,
            },
            panel: Color::Rgb { r: 16, g: 16, b: 24 },
            accent: Color::Rgb {
                r: 255,
                g: 204,
                b: 0,
            },
        },
        Theme::Light => Palette {
            text: Color::Rgb { r: 24, g: 24, b: 24 },
            dim: Color::Rgb {
                r: 110,
                g: 110,
                b: 110,
            },
            panel: Color::Rgb {
                r: 245,
                g: 245,
                b: 240,
            },
            accent: Color::Rgb {
                r: 190,
                g: 70,
                b: 0,
            },
        },
    }
}

fn term_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// A marker character readable on any photo: white over dark pixels, black
/// over bright ones.
fn marker_color(under: Rgb) -> Color {
    let brightness =
        u32::from(under.r) * 299 + u32::from(under.g) * 587 + u32::from(under.b) * 114;
    if brightness > 127_000 {
        Color::Black
    } else {
        Color::White
    }
}

/// Run the game until the player quits. Owns the terminal, never the game
/// state: every key is translated into one controller call and the screen is
/// redrawn from whatever the controller says afterwards.
pub fn run(
    game: &mut Game,
    pool: &ImagePool,
    loader: &Loader,
    prefs: &mut Prefs,
    prefs_filepath: &Path,
    surface: (u32, u32),
) -> io::Result<Outcome> {
    let (width, height) = surface;
    let mut out = io::stdout();

    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, cursor::Hide)?;

    let result = event_loop(
        &mut out, game, pool, loader, prefs, prefs_filepath, width, height,
    );

    execute!(out, ResetColor, LeaveAlternateScreen, cursor::Show)?;
    terminal::disable_raw_mode()?;

    result
}

#[allow(clippy::too_many_arguments)]
fn event_loop(
    out: &mut io::Stdout,
    game: &mut Game,
    pool: &ImagePool,
    loader: &Loader,
    prefs: &mut Prefs,
    prefs_filepath: &Path,
    width: u32,
    height: u32,
) -> io::Result<Outcome> {
    let mut cursor_at = Point::new(width / 2, height / 2);
    let mut outcome = Outcome {
        records: Vec::new(),
        tally: None,
        warnings: Vec::new(),
    };
    let mut dirty = true;

    loop {
        // Load completions first, so a key event never races a half-applied
        // round. Stale generations are refused by the controller.
        while let Some(done) = loader.try_recv() {
            let _ = game.finish_load(done.generation, done.result);
            dirty = true;
        }

        if dirty {
            draw(out, game, cursor_at, palette(prefs.theme))?;
            dirty = false;
        }

        if !event::poll(Duration::from_millis(33))? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Left | KeyCode::Char('h') => {
                    cursor_at.x = cursor_at.x.saturating_sub(1);
                    dirty = true;
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    cursor_at.x = u32::min(cursor_at.x + 1, width - 1);
                    dirty = true;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    cursor_at.y = cursor_at.y.saturating_sub(1);
                    dirty = true;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    cursor_at.y = u32::min(cursor_at.y + 1, height - 1);
                    dirty = true;
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let _ = game.select_pixel(cursor_at);
                    dirty = true;
                }
                KeyCode::Char('s') => {
                    if let Ok(result) = game.submit_round() {
                        // Target and selection are both frozen by a
                        // successful submit.
                        let target = game.revealed_target().expect("resolved round has a target");
                        let selection = game.selection().expect("resolved round has a selection");
                        outcome.records.push(RoundRecord {
                            round: game.round(),
                            target: target.color,
                            target_at: target.at,
                            selection: selection.color,
                            selection_at: selection.at,
                            score: result.score,
                            distance: result.distance,
                        });
                    }
                    dirty = true;
                }
                KeyCode::Char('n') => {
                    let fresh_game = game.phase() == Phase::Ended;
                    if let Ok(ticket) = game.start_round() {
                        if fresh_game {
                            // The data file describes one session only.
                            outcome.records.clear();
                            outcome.tally = None;
                        }
                        loader.request(ticket.generation, pool.pick());
                    }
                    dirty = true;
                }
                KeyCode::Char('e') => {
                    if let Ok(tally) = game.end_game() {
                        outcome.tally = Some(tally);
                    }
                    dirty = true;
                }
                KeyCode::Char('t') => {
                    prefs.theme = prefs.theme.toggled();
                    if let Err(err) = prefs.store(prefs_filepath) {
                        outcome
                            .warnings
                            .push(format!("Failed saving theme preference: {}", err));
                    }
                    dirty = true;
                }
                _ => {}
            },
            Event::Resize(..) => dirty = true,
            _ => {}
        }
    }

    Ok(outcome)
}

fn draw(out: &mut io::Stdout, game: &Game, cursor_at: Point, pal: Palette) -> io::Result<()> {
    queue!(
        out,
        SetBackgroundColor(pal.panel),
        Clear(ClearType::All),
        cursor::MoveTo(0, 0),
        SetForegroundColor(pal.accent),
        Print(format!(" hue hunt  |  round {}", game.round())),
    )?;

    let image_rows = draw_surface(out, game, cursor_at, &pal)?;
    draw_panel(out, game, &pal, image_rows + 2)?;

    queue!(out, ResetColor)?;
    out.flush()
}

/// Paint the raster two rows per terminal line with ▀ cells: the glyph's
/// foreground is the upper pixel, its background the lower one.
fn draw_surface(
    out: &mut io::Stdout,
    game: &Game,
    cursor_at: Point,
    pal: &Palette,
) -> io::Result<u16> {
    let Some(raster) = game.raster() else {
        queue!(
            out,
            cursor::MoveTo(1, 2),
            SetForegroundColor(pal.dim),
            Print("( no image yet; press n to start a round )"),
        )?;
        return Ok(3);
    };

    let selection = game.selection().map(|s| s.at);
    let rows = (raster.height() + 1) / 2;

    for row in 0..rows {
        queue!(out, cursor::MoveTo(0, (row + 1) as u16))?;
        for x in 0..raster.width() {
            let top_at = Point::new(x, row * 2);
            let top = raster.sample(top_at);
            let bottom_at = Point::new(x, row * 2 + 1);
            let bottom = if raster.contains(bottom_at) {
                raster.sample(bottom_at)
            } else {
                top
            };

            // Overlay markers on whichever half-pixel they land on.
            let glyph = if cursor_at == top_at || cursor_at == bottom_at {
                Some(('+', marker_color(raster.sample(cursor_at))))
            } else if selection == Some(top_at) || selection == Some(bottom_at) {
                Some(('x', marker_color(raster.sample(selection.unwrap()))))
            } else {
                None
            };

            match glyph {
                Some((ch, fg)) => queue!(
                    out,
                    SetForegroundColor(fg),
                    SetBackgroundColor(term_color(bottom)),
                    Print(ch)
                )?,
                None => queue!(
                    out,
                    SetForegroundColor(term_color(top)),
                    SetBackgroundColor(term_color(bottom)),
                    Print('\u{2580}')
                )?,
            }
        }
        queue!(out, SetBackgroundColor(pal.panel))?;
    }

    Ok((rows + 1) as u16)
}

fn draw_panel(out: &mut io::Stdout, game: &Game, pal: &Palette, top: u16) -> io::Result<()> {
    queue!(out, SetBackgroundColor(pal.panel))?;

    // Selection swatch and coordinates
    queue!(
        out,
        cursor::MoveTo(1, top),
        SetForegroundColor(pal.text),
        Print("your pick  "),
    )?;
    match game.selection() {
        Some(selection) => queue!(
            out,
            SetBackgroundColor(term_color(selection.color)),
            Print("  "),
            SetBackgroundColor(pal.panel),
            Print(format!(" {} at {}", selection.color.css(), selection.at)),
        )?,
        None => queue!(out, SetForegroundColor(pal.dim), Print("-"))?,
    }

    // Target swatch, never shown before the round resolves
    queue!(
        out,
        cursor::MoveTo(1, top + 1),
        SetForegroundColor(pal.text),
        Print("target     "),
    )?;
    match game.revealed_target() {
        Some(target) => queue!(
            out,
            SetBackgroundColor(term_color(target.color)),
            Print("  "),
            SetBackgroundColor(pal.panel),
            Print(format!(" {} at {}", target.color.css(), target.at)),
        )?,
        None => queue!(
            out,
            SetForegroundColor(pal.dim),
            Print("hidden until you submit"),
        )?,
    }

    // Score and distance for the freshest resolved round
    queue!(out, cursor::MoveTo(1, top + 2))?;
    match game.last_result() {
        Some(result) => queue!(
            out,
            SetForegroundColor(pal.text),
            Print(format!(
                "score {:.2}/10   distance {:.2}",
                result.score, result.distance
            )),
        )?,
        None => queue!(out, SetForegroundColor(pal.dim), Print("score -"))?,
    }

    let totals = game.totals();
    if totals.completed_rounds > 0 {
        queue!(
            out,
            SetForegroundColor(pal.dim),
            Print(format!(
                "   session {:.2} over {} rounds",
                totals.total_score, totals.completed_rounds
            )),
        )?;
    }

    let status_color = if game.phase() == Phase::Ended {
        pal.accent
    } else {
        pal.text
    };
    queue!(
        out,
        cursor::MoveTo(1, top + 4),
        SetForegroundColor(status_color),
        Print(game.status()),
    )?;

    queue!(
        out,
        cursor::MoveTo(1, top + 6),
        SetForegroundColor(pal.dim),
        Print("[arrows] move  [enter] pick  [s] submit  [n] next round  [e] end game  [t] theme  [q] quit"),
    )
}
