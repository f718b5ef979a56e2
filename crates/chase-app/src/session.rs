use crate::cli::{CliError, SessionOptions, join_stations};
use chase_core::AppInfo;
use chase_core::game::belief::Belief;
use chase_core::game::sampler;
use chase_core::game::serialization::PursuitSnapshot;
use chase_core::model::coords::CoordIndex;
use chase_core::model::station::Station;
use chase_core::model::ticket::TicketKind;
use chase_core::network::TransitNetwork;
use chase_map::overlay::{self, MapCanvas, RenderError};
use chase_map::theme::MarkerTheme;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const BOARD_FILE: &str = "board.jpg";
const DEFAULT_SNAPSHOT: &str = "session.json";
// More pieces than any board has stations; everything above is a typo.
const MAX_PIECES: usize = 1_000;

pub fn run_interactive(options: &SessionOptions) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    run_session(&mut input, &mut output, options)
}

/// The whole console session over explicit reader/writer handles. Every
/// malformed entry is absorbed here with a re-prompt; the belief never sees
/// bad input.
pub(crate) fn run_session<R, W>(
    input: &mut R,
    output: &mut W,
    options: &SessionOptions,
) -> Result<(), CliError>
where
    R: BufRead,
    W: Write,
{
    writeln!(
        output,
        "Welcome to the {} ({} v{}).",
        AppInfo::codename(),
        AppInfo::name(),
        AppInfo::version()
    )?;

    let network = TransitNetwork::from_dir(&options.data_dir)?;
    writeln!(
        output,
        "Loaded {} stations from {}.",
        network.station_count(),
        options.data_dir.display()
    )?;

    let mut belief = match &options.resume {
        Some(path) => {
            let json = fs::read_to_string(path)?;
            let belief = PursuitSnapshot::from_json(&json)?.restore();
            writeln!(
                output,
                "Resumed session from {} ({} detectives, {} barrages).",
                path.display(),
                belief.detective_count(),
                belief.barrages().len()
            )?;
            print_status(output, &belief)?;
            belief
        }
        None => {
            let Some(belief) = interview(input, output)? else {
                return Ok(());
            };
            belief
        }
    };

    loop {
        print_menu(output)?;
        let Some(choice) = prompt_line(input, output, "> ")? else {
            break;
        };
        match choice.as_str() {
            "1" => {
                let Some(ticket) =
                    prompt_ticket(input, output, "Ticket (taxi, bus, subway, mystery): ")?
                else {
                    break;
                };
                belief.apply_ticket(&network, ticket);
                print_status(output, &belief)?;
                auto_render(output, options, &network, &belief)?;
            }
            "2" => match collect_round(input, output, &belief)? {
                RoundPlan::Apply {
                    detectives,
                    barrages,
                } => match belief.play_round(&detectives, barrages) {
                    Ok(()) => {
                        writeln!(
                            output,
                            "Round applied. Detectives at {}; barrages at {}.",
                            join_stations(belief.detectives().iter()),
                            join_stations(belief.barrages().iter())
                        )?;
                        print_status(output, &belief)?;
                        auto_render(output, options, &network, &belief)?;
                    }
                    Err(err) => writeln!(output, "{err}")?,
                },
                RoundPlan::Rejected => {}
                RoundPlan::Aborted => break,
            },
            "3" => {
                let Some(spotted) = prompt_station(input, output, "Where was Mister X seen? ")?
                else {
                    break;
                };
                let audit = belief.reveal(spotted);
                if audit.on_detective {
                    writeln!(output, "Odd: a detective already stands on {spotted}.")?;
                }
                if audit.on_barrage {
                    writeln!(output, "Odd: {spotted} is barraged.")?;
                }
                print_status(output, &belief)?;
                auto_render(output, options, &network, &belief)?;
            }
            "4" => draw_board(output, options, &network, &belief)?,
            "5" => {
                let Some(entered) =
                    prompt_line(input, output, "Save to [session.json]: ")?
                else {
                    break;
                };
                let path = if entered.is_empty() {
                    PathBuf::from(DEFAULT_SNAPSHOT)
                } else {
                    PathBuf::from(entered)
                };
                save_snapshot(&belief, &path)?;
                writeln!(output, "Session saved to {}.", path.display())?;
            }
            "q" | "quit" | "exit" => {
                writeln!(output, "Good hunting.")?;
                break;
            }
            "" => {}
            other => writeln!(output, "Unknown choice: {other}")?,
        }
    }

    Ok(())
}

/// Opening interview: detective and barrage positions, one prompt each.
fn interview<R, W>(input: &mut R, output: &mut W) -> Result<Option<Belief>, CliError>
where
    R: BufRead,
    W: Write,
{
    let Some(count) = prompt_count(input, output, "How many detectives are playing? ")? else {
        return Ok(None);
    };
    let mut detectives = Vec::with_capacity(count);
    for index in 0..count {
        let label = format!("Detective {} station: ", index + 1);
        let Some(station) = prompt_station(input, output, &label)? else {
            return Ok(None);
        };
        detectives.push(station);
    }

    let Some(barrage_count) = prompt_count(input, output, "How many barrages are on the board? ")?
    else {
        return Ok(None);
    };
    let mut barrages = BTreeSet::new();
    for index in 0..barrage_count {
        let label = format!("Barrage {} station: ", index + 1);
        let Some(station) = prompt_station(input, output, &label)? else {
            return Ok(None);
        };
        barrages.insert(station);
    }

    let mut belief = Belief::new(detectives);
    belief.set_barrages(barrages);
    Ok(Some(belief))
}

enum RoundPlan {
    Apply {
        detectives: Vec<Station>,
        barrages: BTreeSet<Station>,
    },
    Rejected,
    Aborted,
}

/// Collects a whole detective round before anything is applied: every new
/// position, then the optional barrage relocation onto a vacated square. A
/// bad relocation rejects the round; the belief is never half updated.
fn collect_round<R, W>(input: &mut R, output: &mut W, belief: &Belief) -> Result<RoundPlan, CliError>
where
    R: BufRead,
    W: Write,
{
    let mut moved = Vec::with_capacity(belief.detective_count());
    for index in 0..belief.detective_count() {
        let label = format!("Detective {} new station: ", index + 1);
        let Some(station) = prompt_station(input, output, &label)? else {
            return Ok(RoundPlan::Aborted);
        };
        moved.push(station);
    }

    let vacated: BTreeSet<Station> = belief
        .detectives()
        .iter()
        .copied()
        .filter(|station| !moved.contains(station))
        .collect();

    let mut barrages = belief.barrages().clone();
    if !barrages.is_empty() && !vacated.is_empty() {
        let Some(answer) =
            prompt_line(input, output, "Move a barrage onto a vacated square? [y/N] ")?
        else {
            return Ok(RoundPlan::Aborted);
        };
        if answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes") {
            let Some(from) = prompt_station(input, output, "Which barrage moves? ")? else {
                return Ok(RoundPlan::Aborted);
            };
            if !barrages.contains(&from) {
                writeln!(output, "No barrage stands at {from}; the round is rejected.")?;
                return Ok(RoundPlan::Rejected);
            }
            let Some(to) = prompt_station(input, output, "Which vacated square does it cover? ")?
            else {
                return Ok(RoundPlan::Aborted);
            };
            if !vacated.contains(&to) {
                writeln!(
                    output,
                    "Station {to} was not vacated this round; the round is rejected."
                )?;
                return Ok(RoundPlan::Rejected);
            }
            barrages.remove(&from);
            barrages.insert(to);
        }
    }

    Ok(RoundPlan::Apply {
        detectives: moved,
        barrages,
    })
}

fn print_menu<W: Write>(output: &mut W) -> io::Result<()> {
    writeln!(output)?;
    writeln!(output, "1) Mister X used a ticket")?;
    writeln!(output, "2) The detectives moved")?;
    writeln!(output, "3) Mister X was spotted")?;
    writeln!(output, "4) Draw the board")?;
    writeln!(output, "5) Save the session")?;
    writeln!(output, "q) Quit")?;
    Ok(())
}

fn print_status<W: Write>(output: &mut W, belief: &Belief) -> io::Result<()> {
    if belief.candidates().is_empty() {
        writeln!(output, "Mister X has nowhere left to hide.")?;
        return Ok(());
    }
    writeln!(
        output,
        "Mister X can be at: {}",
        join_stations(belief.candidates().iter())
    )?;
    if belief.candidates().len() > 1 {
        if let Some(hint) = sampler::sample_candidate(belief, &mut rand::thread_rng()) {
            writeln!(output, "Worth a knock first: station {hint}")?;
        }
    }
    Ok(())
}

fn save_snapshot(belief: &Belief, path: &Path) -> Result<(), CliError> {
    let json = PursuitSnapshot::to_json(belief)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, json)?;
    Ok(())
}

fn draw_board<W: Write>(
    output: &mut W,
    options: &SessionOptions,
    network: &TransitNetwork,
    belief: &Belief,
) -> Result<(), CliError> {
    let rendered = resolve_canvas(options, network.coordinates()).and_then(|canvas| {
        overlay::render_to_file(
            &canvas,
            network.coordinates(),
            belief,
            MarkerTheme::current(),
            &options.out_path,
        )
    });
    match rendered {
        Ok(report) => writeln!(
            output,
            "Board drawn to {} ({} markers, {} without artwork).",
            options.out_path.display(),
            report.drawn,
            report.skipped
        )?,
        Err(err) => writeln!(output, "Could not draw the board: {err}")?,
    }
    Ok(())
}

fn auto_render<W: Write>(
    output: &mut W,
    options: &SessionOptions,
    network: &TransitNetwork,
    belief: &Belief,
) -> Result<(), CliError> {
    if auto_render_enabled() {
        draw_board(output, options, network, belief)?;
    }
    Ok(())
}

fn resolve_canvas(options: &SessionOptions, coords: &CoordIndex) -> Result<MapCanvas, RenderError> {
    if let Some(path) = &options.map_path {
        return MapCanvas::open(path);
    }
    let default_path = options.data_dir.join(BOARD_FILE);
    if default_path.exists() {
        return MapCanvas::open(&default_path);
    }
    blank_canvas_for(coords)
}

fn blank_canvas_for(coords: &CoordIndex) -> Result<MapCanvas, RenderError> {
    let (width, height) = canvas_size_for(coords, MarkerTheme::current().radius);
    MapCanvas::blank(width, height)
}

// Big enough to hold every marker when no artwork ships with the data.
// Saturating: a coordinate near u32::MAX must not wrap the canvas size.
fn canvas_size_for(coords: &CoordIndex, radius: u32) -> (u32, u32) {
    let margin = radius.saturating_mul(2);
    let mut width = 400;
    let mut height = 400;
    for (_, point) in coords.iter() {
        width = width.max(point.x.saturating_add(margin));
        height = height.max(point.y.saturating_add(margin));
    }
    (width, height)
}

fn auto_render_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| {
        std::env::var("NYCHASE_AUTO_RENDER")
            .map(|value| {
                let value = value.trim();
                value == "1"
                    || value.eq_ignore_ascii_case("true")
                    || value.eq_ignore_ascii_case("yes")
                    || value.eq_ignore_ascii_case("on")
            })
            .unwrap_or(false)
    })
}

fn prompt_line<R, W>(input: &mut R, output: &mut W, prompt: &str) -> Result<Option<String>, CliError>
where
    R: BufRead,
    W: Write,
{
    write!(output, "{prompt}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_station<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<Station>, CliError>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(line) = prompt_line(input, output, prompt)? else {
            return Ok(None);
        };
        if let Some(station) = Station::parse(&line) {
            return Ok(Some(station));
        }
        writeln!(output, "Station labels are positive numbers; try again.")?;
    }
}

fn prompt_count<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<usize>, CliError>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(line) = prompt_line(input, output, prompt)? else {
            return Ok(None);
        };
        match line.parse::<usize>() {
            Ok(count) if count <= MAX_PIECES => return Ok(Some(count)),
            Ok(count) => {
                writeln!(output, "{count} pieces will not fit on the board; try again.")?
            }
            Err(_) => writeln!(output, "Enter a whole number.")?,
        }
    }
}

fn prompt_ticket<R, W>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<TicketKind>, CliError>
where
    R: BufRead,
    W: Write,
{
    loop {
        let Some(line) = prompt_line(input, output, prompt)? else {
            return Ok(None);
        };
        if let Some(ticket) = TicketKind::from_str(&line) {
            return Ok(Some(ticket));
        }
        writeln!(output, "Tickets are taxi, bus, subway or mystery.")?;
    }
}
