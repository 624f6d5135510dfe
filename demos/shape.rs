use std::path::PathBuf;
use std::str::FromStr;

use ot_shaper::{
    BufferClusterLevel, BufferFlags, Direction, Face, Feature, Font, Language, SerializeFlags,
    UnicodeBuffer, Variation,
};

const HELP: &str = "\
Usage: shape [OPTIONS] <FONT-FILE> [TEXT]

Font options:
    --font-file PATH                Set font file-name
    -y, --face-index INDEX          Set face index [default: 0]
    --font-ptem NUMBER              Set font point-size
    --variations LIST               Comma-separated list of font variations

Input options:
    --text TEXT                     Set input text
    --text-file PATH                Set input text file-name
    -u, --unicodes LIST             Set input Unicode codepoints
                                    Examples: 'U+0056,U+0057'
    --unicodes-before LIST          Set Unicode codepoints context before each line
    --unicodes-after LIST           Set Unicode codepoints context after each line
    --single-par                    Treat text as single paragraph

Shaping options:
    --direction DIRECTION           Set text direction (ltr/rtl/ttb/btt)
    --language LANG                 Set text language
    --script TAG                    Set text script as ISO-15924 tag
    --features LIST                 Comma-separated list of font features
    --utf8-clusters                 Use UTF-8 byte indices, not char indices
    --cluster-level N               Cluster merging level [default: 0]
                                    [possible values: 0, 1, 2]
    --bot                           Treat text as beginning of paragraph
    --eot                           Treat text as end of paragraph
    --preserve-default-ignorables   Preserve Default-Ignorable characters
    --remove-default-ignorables     Remove Default-Ignorable characters
    --unsafe-to-concat              Produce unsafe-to-concat glyph flag
    --safe-to-insert-tatweel        Produce safe-to-insert-tatweel glyph flag

Output syntax options:
    --no-glyph-names                Output glyph indices instead of names
    --no-positions                  Do not output glyph positions
    --no-advances                   Do not output glyph advances
    --no-clusters                   Do not output cluster indices
    --show-extents                  Output glyph extents
    --show-flags                    Output glyph flags
    --ned                           No Extra Data; Do not output clusters or advances

Other options:
    -h, --help                      Show help options
    --version                       Show version number

Set RUST_LOG=debug to trace plan compilation.
";

struct Args {
    help: bool,
    version: bool,
    font_file: Option<PathBuf>,
    face_index: u32,
    font_ptem: Option<f32>,
    variations: Vec<Variation>,
    text: Option<String>,
    text_file: Option<PathBuf>,
    unicodes: Option<String>,
    unicodes_before: Option<String>,
    unicodes_after: Option<String>,
    single_par: bool,
    direction: Option<Direction>,
    language: Option<Language>,
    script: Option<ot_shaper::Script>,
    features: Vec<Feature>,
    utf8_clusters: bool,
    cluster_level: BufferClusterLevel,
    bot: bool,
    eot: bool,
    preserve_default_ignorables: bool,
    remove_default_ignorables: bool,
    unsafe_to_concat: bool,
    safe_to_insert_tatweel: bool,
    no_glyph_names: bool,
    no_positions: bool,
    no_advances: bool,
    no_clusters: bool,
    show_extents: bool,
    show_flags: bool,
    ned: bool,
    free: Vec<String>,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    Ok(Args {
        help: args.contains(["-h", "--help"]),
        version: args.contains("--version"),
        font_file: args.opt_value_from_str("--font-file")?,
        face_index: args
            .opt_value_from_str(["-y", "--face-index"])?
            .unwrap_or(0),
        font_ptem: args.opt_value_from_str("--font-ptem")?,
        variations: args
            .opt_value_from_fn("--variations", parse_variations)?
            .unwrap_or_default(),
        text: args.opt_value_from_str("--text")?,
        text_file: args.opt_value_from_str("--text-file")?,
        unicodes: args.opt_value_from_fn(["-u", "--unicodes"], parse_unicodes)?,
        unicodes_before: args.opt_value_from_fn("--unicodes-before", parse_unicodes)?,
        unicodes_after: args.opt_value_from_fn("--unicodes-after", parse_unicodes)?,
        single_par: args.contains("--single-par"),
        direction: args.opt_value_from_str("--direction")?,
        language: args.opt_value_from_str("--language")?,
        script: args.opt_value_from_str("--script")?,
        features: args
            .opt_value_from_fn("--features", parse_features)?
            .unwrap_or_default(),
        utf8_clusters: args.contains("--utf8-clusters"),
        cluster_level: args
            .opt_value_from_fn("--cluster-level", parse_cluster)?
            .unwrap_or_default(),
        bot: args.contains("--bot"),
        eot: args.contains("--eot"),
        preserve_default_ignorables: args.contains("--preserve-default-ignorables"),
        remove_default_ignorables: args.contains("--remove-default-ignorables"),
        unsafe_to_concat: args.contains("--unsafe-to-concat"),
        safe_to_insert_tatweel: args.contains("--safe-to-insert-tatweel"),
        no_glyph_names: args.contains("--no-glyph-names"),
        no_positions: args.contains("--no-positions"),
        no_advances: args.contains("--no-advances"),
        no_clusters: args.contains("--no-clusters"),
        show_extents: args.contains("--show-extents"),
        show_flags: args.contains("--show-flags"),
        ned: args.contains("--ned"),
        free: args
            .finish()
            .iter()
            .map(|s| s.to_string_lossy().to_string())
            .collect(),
    })
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {e}.");
            std::process::exit(1);
        }
    };

    if args.version {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if args.help {
        print!("{HELP}");
        return;
    }

    let mut font_set_as_free_arg = false;
    let font_path = if let Some(path) = args.font_file.clone() {
        path
    } else if !args.free.is_empty() {
        font_set_as_free_arg = true;
        PathBuf::from(&args.free[0])
    } else {
        eprintln!("Error: font is not set.");
        std::process::exit(1);
    };

    let font_data = std::fs::read(&font_path).unwrap_or_else(|e| {
        eprintln!("Error: cannot read '{}': {e}", font_path.display());
        std::process::exit(1);
    });
    let face = Face::from_slice(&font_data, args.face_index).unwrap_or_else(|e| {
        eprintln!("Error: {e}.");
        std::process::exit(1);
    });

    let mut font = Font::new(&face);
    if let Some(ptem) = args.font_ptem {
        font.set_ptem(ptem);
    }
    if !args.variations.is_empty() {
        font.set_variations(&args.variations);
    }

    let mut buffer_flags = BufferFlags::default();
    buffer_flags.set(BufferFlags::BEGINNING_OF_TEXT, args.bot);
    buffer_flags.set(BufferFlags::END_OF_TEXT, args.eot);
    buffer_flags.set(
        BufferFlags::PRESERVE_DEFAULT_IGNORABLES,
        args.preserve_default_ignorables,
    );
    buffer_flags.set(
        BufferFlags::REMOVE_DEFAULT_IGNORABLES,
        args.remove_default_ignorables,
    );
    buffer_flags.set(BufferFlags::PRODUCE_UNSAFE_TO_CONCAT, args.unsafe_to_concat);
    buffer_flags.set(
        BufferFlags::PRODUCE_SAFE_TO_INSERT_TATWEEL,
        args.safe_to_insert_tatweel,
    );

    let mut format_flags = SerializeFlags::default();
    if args.no_glyph_names {
        format_flags |= SerializeFlags::NO_GLYPH_NAMES;
    }
    if args.no_clusters || args.ned {
        format_flags |= SerializeFlags::NO_CLUSTERS;
    }
    if args.no_positions {
        format_flags |= SerializeFlags::NO_POSITIONS;
    }
    if args.no_advances || args.ned {
        format_flags |= SerializeFlags::NO_ADVANCES;
    }
    if args.show_extents {
        format_flags |= SerializeFlags::GLYPH_EXTENTS;
    }
    if args.show_flags {
        format_flags |= SerializeFlags::GLYPH_FLAGS;
    }

    let text = if let Some(ref path) = args.text_file {
        std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error: cannot read '{}': {e}", path.display());
            std::process::exit(1);
        })
    } else if args.free.len() == 2 && font_set_as_free_arg {
        args.free[1].clone()
    } else if args.free.len() == 1 && !font_set_as_free_arg {
        args.free[0].clone()
    } else if let Some(ref text) = args.unicodes {
        text.clone()
    } else if let Some(ref text) = args.text {
        text.clone()
    } else {
        eprintln!("Error: text is not set.");
        std::process::exit(1);
    };

    let lines: Vec<&str> = if args.single_par {
        vec![&text]
    } else {
        text.split('\n').filter(|s| !s.is_empty()).collect()
    };

    let mut buffer = UnicodeBuffer::new();
    for text in lines {
        if let Some(ref context) = args.unicodes_before {
            buffer.set_pre_context(context);
        }
        buffer.push_str(text);
        if let Some(ref context) = args.unicodes_after {
            buffer.set_post_context(context);
        }

        if let Some(d) = args.direction {
            buffer.set_direction(d);
        }
        if let Some(ref language) = args.language {
            buffer.set_language(language.clone());
        }
        if let Some(script) = args.script {
            buffer.set_script(script);
        }

        buffer.set_cluster_level(args.cluster_level);
        if !args.utf8_clusters {
            buffer.reset_clusters();
        }
        buffer.set_flags(buffer_flags);
        buffer.guess_segment_properties();

        let glyph_buffer = ot_shaper::shape(&font, &args.features, buffer);
        println!("[{}]", glyph_buffer.serialize(&font, format_flags));
        buffer = glyph_buffer.clear();
    }
}

fn parse_unicodes(s: &str) -> Result<String, String> {
    let mut text = String::new();
    for u in s.split(',') {
        let digits = u.strip_prefix("U+").unwrap_or(u);
        let u = u32::from_str_radix(digits, 16)
            .map_err(|_| format!("'{u}' is not a valid codepoint"))?;
        let c = char::try_from(u).map_err(|_| format!("{u} is not a valid codepoint"))?;
        text.push(c);
    }
    Ok(text)
}

fn parse_features(s: &str) -> Result<Vec<Feature>, String> {
    s.split(',')
        .map(|f| Feature::from_str(f).map_err(|e| format!("'{f}': {e}")))
        .collect()
}

fn parse_variations(s: &str) -> Result<Vec<Variation>, String> {
    s.split(',')
        .map(|v| Variation::from_str(v).map_err(|e| format!("'{v}': {e}")))
        .collect()
}

fn parse_cluster(s: &str) -> Result<BufferClusterLevel, String> {
    match s {
        "0" => Ok(BufferClusterLevel::MonotoneGraphemes),
        "1" => Ok(BufferClusterLevel::MonotoneCharacters),
        "2" => Ok(BufferClusterLevel::Characters),
        _ => Err("invalid cluster level".to_string()),
    }
}
