use clap::ArgMatches;

mod app;

/// The validated arguments passed in by the user
#[derive(Debug, Clone)]
pub struct Args {
    pub image_paths: Vec<String>,
    pub pool_dir: Option<String>,
    pub width: u32,
    pub height: u32,
    pub data_filepath: Option<String>,
    pub prefs_filepath: String,
    pub verbosity: u8,
}

fn string_arg(matches: &ArgMatches, name: &str) -> String {
    matches
        .get_one::<String>(name)
        .expect("Required or default value")
        .to_string()
}

fn opt_string_arg(matches: &ArgMatches, name: &str) -> Option<String> {
    matches.get_one::<String>(name).map(|s| s.to_string())
}

fn strings_arg(matches: &ArgMatches, name: &str) -> Vec<String> {
    matches
        .get_many::<String>(name)
        .map(|values| values.map(|s| s.to_string()).collect())
        .unwrap_or_default()
}

pub fn parse_args() -> Args {
    let matches = app::create().get_matches();

    let args = Args {
        image_paths: strings_arg(&matches, "images"),
        pool_dir: opt_string_arg(&matches, "pool_dir"),
        width: *matches.get_one::<u32>("width").expect("There is a default"),
        height: *matches.get_one::<u32>("height").expect("There is a default"),
        data_filepath: opt_string_arg(&matches, "data_filepath"),
        prefs_filepath: string_arg(&matches, "prefs_filepath"),
        verbosity: matches.get_count("verbose"),
    };

    if args.verbosity > 1 {
        println!("Running with arguments: {:?}", args);
    }

    args
}
