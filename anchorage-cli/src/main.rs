// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::{
    cell::Cell,
    fmt, fs,
    io::{self, BufRead, Write},
    rc::Rc,
    time::Duration,
};

use anchorage::{
    board::CannotPlaceReason,
    fleet::{FleetClient, FleetError, FleetResponse},
    Editor, Vessel, VesselId,
};
use clap::{App, Arg, ArgMatches};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    let matches = App::new("Anchorage")
        .version("0.1")
        .author("Zachary Stewart <zachary@zstewart.com>")
        .about("Place a fleet of vessels onto an anchorage from the command line.")
        .arg(
            Arg::with_name("fleet_file")
                .short("f")
                .long("fleet-file")
                .value_name("PATH")
                .help("read the fleet descriptor from a JSON file instead of fetching it")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("url")
                .short("u")
                .long("url")
                .value_name("URL")
                .help("endpoint to fetch a random fleet from")
                .takes_value(true)
                .conflicts_with("fleet_file"),
        )
        .arg(
            Arg::with_name("timeout")
                .short("t")
                .long("timeout")
                .value_name("SECS")
                .help("fetch timeout in seconds")
                .takes_value(true)
                .default_value("10"),
        )
        .get_matches();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let fleet = match load_fleet(&matches) {
        Ok(fleet) => fleet,
        Err(err) => {
            eprintln!("Could not load a fleet: {}", err);
            std::process::exit(1);
        }
    };
    info!(vessels = fleet.vessel_count(), "fleet loaded");

    let stdin = std::io::stdin();
    let mut input = InputReader::new(stdin.lock());
    let mut editor = Editor::from_fleet(&fleet);
    edit_placements(&mut editor, &mut input)?;

    println!();
    println!("Final anchorage:");
    show_board(&editor);
    Ok(())
}

/// Reasons the session could not start.
#[derive(Debug, Error)]
enum LoadError {
    #[error("could not read {path}: {source}")]
    Read { path: String, source: io::Error },

    #[error("could not start the async runtime: {0}")]
    Runtime(io::Error),

    #[error(transparent)]
    Fleet(#[from] FleetError),
}

/// Read the fleet descriptor from the file given on the command line, or fetch it.
/// Ctrl-C abandons a fetch in progress.
fn load_fleet(matches: &ArgMatches) -> Result<FleetResponse, LoadError> {
    if let Some(path) = matches.value_of("fleet_file") {
        let json = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_string(),
            source,
        })?;
        return Ok(FleetResponse::from_json(&json)?);
    }

    let timeout = match matches.value_of("timeout").unwrap_or("10").parse() {
        Ok(secs) => Duration::from_secs(secs),
        Err(_) => {
            warn!("invalid timeout, using 10 seconds");
            Duration::from_secs(10)
        }
    };
    let client = match matches.value_of("url") {
        Some(url) => FleetClient::with_url(url),
        None => FleetClient::new(),
    }
    .with_timeout(timeout);

    println!("Fetching a fleet from {} ...", client.url());
    let runtime = tokio::runtime::Runtime::new().map_err(LoadError::Runtime)?;
    let fleet = runtime.block_on(client.fetch_random_fleet_until(async {
        let _ = tokio::signal::ctrl_c().await;
    }))?;
    Ok(fleet)
}

/// Drive the editor with commands from the user until they are done.
fn edit_placements(
    editor: &mut Editor,
    input: &mut InputReader<impl BufRead>,
) -> io::Result<()> {
    enum Command {
        Done,
        Quit,
        Drag(VesselId, f64, f64),
        Drop(i32, i32),
        EndDrag,
        Place(VesselId, i32, i32),
        Remove(VesselId),
        Rotate(VesselId),
        Clear,
        RandomizeRest,
        List,
        Help,
    }

    // Redraw only after the editor reports a change.
    let dirty = Rc::new(Cell::new(true));
    let flag = Rc::clone(&dirty);
    editor.subscribe(move |_, _| flag.set(true));

    let mut rng = rand::thread_rng();
    println!();
    println!("Place vessels. Type help or ? for commands.");
    loop {
        /// Matchers for commands with args.
        static PLACE: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?x)(?:place|put)\s+
        (?P<vessel>[\w-]+)\s+
        (?:(?:at|on|to|->|=>)\s+)?
        (?P<x>-?[0-9]+)(?:\s*,\s*|\s+)(?P<y>-?[0-9]+)$",
            )
            .unwrap()
        });
        static DRAG: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?x)(?:drag|grab|pick)\s+
        (?P<vessel>[\w-]+)
        (?:\s+(?P<ox>-?[0-9]+(?:\.[0-9]*)?)(?:\s*,\s*|\s+)(?P<oy>-?[0-9]+(?:\.[0-9]*)?))?$",
            )
            .unwrap()
        });
        static DROP: Lazy<Regex> = Lazy::new(|| {
            Regex::new(
                r"^(?x)drop\s+
        (?:(?:at|on|to|->|=>)\s+)?
        (?P<x>-?[0-9]+)(?:\s*,\s*|\s+)(?P<y>-?[0-9]+)$",
            )
            .unwrap()
        });
        static REMOVE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(?:un-?place|remove)\s+(?P<vessel>[\w-]+)$").unwrap());
        static ROTATE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(?:rotate|turn)\s+(?P<vessel>[\w-]+)$").unwrap());

        if dirty.replace(false) {
            println!();
            show_status(editor);
            show_board(editor);
            println!();
        }

        let view: &Editor = editor;
        let cmd = input.read_input_lower("> ", |line| match line {
            "?" | "help" | "h" => Some(Command::Help),
            "randomize" | "rand" | "random" => Some(Command::RandomizeRest),
            "done" | "finish" => Some(Command::Done),
            "quit" | "exit" | "q" => Some(Command::Quit),
            "end" | "release" | "cancel" => Some(Command::EndDrag),
            "clear" => Some(Command::Clear),
            "list" | "ls" => Some(Command::List),
            other => {
                if let Some(captures) = PLACE.captures(other) {
                    let vessel = resolve_vessel(view, &captures["vessel"])?;
                    let x = parse_cell("x", &captures["x"])?;
                    let y = parse_cell("y", &captures["y"])?;
                    Some(Command::Place(vessel, x, y))
                } else if let Some(captures) = DRAG.captures(other) {
                    let vessel = resolve_vessel(view, &captures["vessel"])?;
                    let ox = captures.name("ox").map_or(Some(0.0), |m| parse_offset(m.as_str()))?;
                    let oy = captures.name("oy").map_or(Some(0.0), |m| parse_offset(m.as_str()))?;
                    Some(Command::Drag(vessel, ox, oy))
                } else if let Some(captures) = DROP.captures(other) {
                    let x = parse_cell("x", &captures["x"])?;
                    let y = parse_cell("y", &captures["y"])?;
                    Some(Command::Drop(x, y))
                } else if let Some(captures) = REMOVE.captures(other) {
                    if &captures["vessel"] == "all" {
                        return Some(Command::Clear);
                    }
                    Some(Command::Remove(resolve_vessel(view, &captures["vessel"])?))
                } else if let Some(captures) = ROTATE.captures(other) {
                    Some(Command::Rotate(resolve_vessel(view, &captures["vessel"])?))
                } else {
                    println!("Invalid command \"{}\". Use '?' for help", other);
                    None
                }
            }
        })?;

        match cmd {
            Command::Done if editor.is_complete() => break,
            Command::Done => println!("You must place all your vessels first!"),
            Command::Quit => break,
            Command::Drag(vessel, ox, oy) => {
                editor.begin_drag(vessel, ox, oy);
            }
            Command::Drop(x, y) => match editor.dragging_vessel().cloned() {
                None => println!("Nothing is being dragged. Use \"drag <vessel>\" first."),
                Some(vessel) => {
                    if !editor.try_place(x, y) {
                        explain_rejection(editor, &vessel, x, y);
                    }
                }
            },
            Command::EndDrag => {
                let abandoned = editor
                    .drag()
                    .filter(|drag| !drag.succeeded())
                    .and_then(|drag| editor.board().vessel(drag.vessel_id()))
                    .map(Vessel::label);
                if !editor.end_drag() {
                    println!("Nothing is being dragged.");
                } else if let Some(label) = abandoned {
                    println!("{} was not dropped and returns to its pool.", label);
                }
            }
            Command::Place(vessel, x, y) => {
                editor.begin_drag(vessel, 0.0, 0.0);
                if !editor.try_place(x, y) {
                    if let Some(vessel) = editor.dragging_vessel().cloned() {
                        explain_rejection(editor, &vessel, x, y);
                    }
                }
                editor.end_drag();
            }
            Command::Remove(vessel) => {
                if editor.release(vessel).is_none() {
                    println!("That vessel is not placed.");
                }
            }
            Command::Rotate(vessel) => {
                if !editor.rotate(vessel) {
                    println!("Cannot rotate: the rotated vessel would not fit where it is.");
                }
            }
            Command::Clear => {
                editor.clear_placements();
            }
            Command::RandomizeRest => {
                let placed = editor.place_remaining(&mut rng);
                let pending = editor.board().pending_vessels().count();
                if pending > 0 {
                    println!(
                        "Placed {} vessels; {} did not fit anywhere.",
                        placed, pending
                    );
                }
            }
            Command::List => show_vessels(editor),
            Command::Help => {
                println!(
                    "Available Commands:
    drag <vessel> [<ox>,<oy>]   pick up a vessel, optionally grabbed at an offset.
    drop <x>,<y>                drop the dragged vessel with its top-left corner at the cell.
        May be repeated; the last successful drop counts.
    end                         finish dragging. A vessel never dropped returns to its pool.
    place <vessel> <x>,<y>      drag, drop and finish in one step.
    remove <vessel>             return a placed vessel to its pool (\"all\" clears every vessel).
    rotate <vessel>             swap the vessel's width and height.
    clear                       return every vessel to its pool.
    randomize                   place the remaining vessels at random.
    list                        list the vessels and where they are.
    done                        finish, once every vessel is placed.
    quit                        leave without finishing.

Vessels are named by their number in the list or by label, e.g. \"destroyer-2\".",
                );
            }
        }
    }
    Ok(())
}

/// Find a vessel by its 1-based listing number or by its label.
fn resolve_vessel(editor: &Editor, name: &str) -> Option<VesselId> {
    let board = editor.board();
    let found = match name.parse::<usize>() {
        Ok(n) if n > 0 => board.vessels().nth(n - 1),
        Ok(_) => None,
        Err(_) => board
            .vessels()
            .find(|vessel| vessel.label().to_ascii_lowercase() == name),
    };
    if found.is_none() {
        println!("Unknown vessel \"{}\". Use \"list\" to see vessel names.", name);
    }
    found.map(Vessel::id)
}

/// Parse a cell coordinate component.
fn parse_cell(axis: &str, text: &str) -> Option<i32> {
    match text.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            println!("invalid {}: {}", axis, text);
            None
        }
    }
}

/// Parse a grab offset.
fn parse_offset(text: &str) -> Option<f64> {
    match text.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            println!("invalid offset: {}", text);
            None
        }
    }
}

/// Print why the vessel cannot go to `(x, y)`.
fn explain_rejection(editor: &Editor, vessel: &Vessel, x: i32, y: i32) {
    match editor.check_placement(vessel, x, y) {
        Ok(()) => {}
        Err(err) => match err.reason() {
            CannotPlaceReason::OutOfBounds => {
                println!("Invalid placement: not enough space on the anchorage.")
            }
            CannotPlaceReason::AlreadyOccupied => {
                println!("Invalid placement: overlaps another vessel.")
            }
            CannotPlaceReason::UnknownVessel => println!("Invalid placement: unknown vessel."),
        },
    }
}

/// Print the drag state and what is left to place.
fn show_status(editor: &Editor) {
    if let Some(vessel) = editor.dragging_vessel() {
        println!(
            "Dragging {} ({}x{}){}",
            vessel.label(),
            vessel.width(),
            vessel.height(),
            if editor.drag().map_or(false, |drag| drag.succeeded()) {
                ", dropped"
            } else {
                ""
            }
        );
    }
    if editor.is_complete() {
        println!("All vessels placed, type done to finish");
    } else {
        let mut pending = editor.board().pending_vessels().map(VesselName);
        if let Some(first) = pending.next() {
            print!("Remaining vessels to place: {}", first);
            for vessel in pending {
                print!(", {}", vessel);
            }
            println!();
        }
    }
}

/// Print every vessel with its number, size and position.
fn show_vessels(editor: &Editor) {
    let board = editor.board();
    for (n, vessel) in board.vessels().enumerate() {
        let position = match board.placement(vessel.id()) {
            Some(placement) => format!("at {},{}", placement.x(), placement.y()),
            None => "in pool".to_string(),
        };
        println!(
            "{:>3}  {:<20} {}x{}  {}  {}",
            n + 1,
            VesselName(vessel),
            vessel.width(),
            vessel.height(),
            vessel.color(),
            position
        );
    }
}

/// Largest anchorage, in cells, that is drawn in full.
const MAX_DRAWN_CELLS: u64 = 10_000;

/// Print the anchorage, marking each occupied cell with its vessel's listing number.
fn show_board(editor: &Editor) {
    enum BoardCell {
        Empty,
        Vessel(usize),
    }
    impl fmt::Display for BoardCell {
        fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
            match self {
                BoardCell::Empty => f.pad("~~"),
                BoardCell::Vessel(n) => f.pad(&n.to_string()),
            }
        }
    }

    let board = editor.board();
    let dim = board.dimensions();
    if dim.area() > MAX_DRAWN_CELLS {
        println!(
            "The {}x{} anchorage is too large to draw; {} cells are occupied.",
            dim.width,
            dim.height,
            board.occupied_count()
        );
        return;
    }
    let numbers: Vec<VesselId> = board.vessels().map(Vessel::id).collect();
    print!("   ");
    for i in 0..dim.width.max(0) {
        print!("{:^4}", i);
    }
    println!();
    for (i, row) in board.iter_rows().enumerate() {
        print!("{:>2} ", i);
        for cell in row {
            let cell = match cell.and_then(|id| numbers.iter().position(|n| *n == id)) {
                Some(n) => BoardCell::Vessel(n + 1),
                None => BoardCell::Empty,
            };
            print!("{:^4}", cell);
        }
        println!();
    }
}

/// Display helper that prints the vessel's label.
struct VesselName<'a>(&'a Vessel);

impl fmt::Display for VesselName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.pad(&self.0.label())
    }
}

/// Helper to read input from the user.
struct InputReader<B> {
    read: B,
    buf: String,
}

impl<B> InputReader<B> {
    fn new(read: B) -> Self {
        Self {
            read,
            buf: String::new(),
        }
    }
}

impl<B: BufRead> InputReader<B> {
    /// Repeatedly tries to read input until the input checker returns `Some`. Converts
    /// to ascii lower before running the checker.
    fn read_input_lower<F, T>(&mut self, prompt: &str, mut checker: F) -> io::Result<T>
    where
        F: FnMut(&str) -> Option<T>,
    {
        loop {
            self.read_input_inner(prompt)?;
            self.buf.make_ascii_lowercase();
            if let Some(val) = checker(self.buf.trim()) {
                return Ok(val);
            }
        }
    }

    /// Helper to print the prompt, clear the string buffer and read a line.
    fn read_input_inner(&mut self, prompt: &str) -> io::Result<()> {
        print!("{} ", prompt);
        io::stdout().flush()?;
        self.buf.clear();
        if self.read.read_line(&mut self.buf)? == 0 {
            println!();
            std::process::exit(0);
        }
        Ok(())
    }
}
