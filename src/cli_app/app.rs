use clap::{command, value_parser, Arg, Command};

pub fn create() -> Command {
    command!()
    .arg(Arg::new("images")
        .value_name("FILEPATH")
        .num_args(0..)
        .help("Image files added to the round pool. Each round draws one at random.")
    )
    .arg(Arg::new("pool_dir")
        .value_name("DIRECTORY")
        .short('P')
        .long("pool-dir")
        .help("Add every image file found in this directory to the round pool.")
    )
    .arg(Arg::new("width")
        .value_name("INTEGER")
        .short('W')
        .long("width")
        .default_value("80")
        .value_parser(value_parser!(u32).range(8..=512))
        .help("Width in pixels of the playing surface the photo is drawn into. One pixel is one terminal column. [range: 8-512]")
    )
    .arg(Arg::new("height")
        .value_name("INTEGER")
        .short('H')
        .long("height")
        .default_value("44")
        .value_parser(value_parser!(u32).range(8..=512))
        .help("Height in pixels of the playing surface. Two pixel rows share one terminal row. [range: 8-512]")
    )
    .arg(Arg::new("data_filepath")
        .value_name("FILEPATH")
        .short('d')
        .long("data-filepath")
        .help("The game will write session information as a JSON file if this filepath is given. The session information includes every resolved round with its target and selected colors, the per-round scores and distances, and the cumulative total.")
    )
    .arg(Arg::new("prefs_filepath")
        .value_name("FILEPATH")
        .long("prefs-filepath")
        .default_value("hue_hunt_prefs.json")
        .help("Where the theme preference is stored. Read at startup, written when the theme is toggled.")
    )
    .arg(Arg::new("verbose")
        .short('v')
        .long("verbose")
        .action(clap::ArgAction::Count)
        .help("Output debugging messages. Pass multiple times for more verbose logging.")
    )
}
