mod font;
mod layout;
mod lookups;
mod metrics;
mod positioning;
mod properties;
mod shapers;

use std::ffi::OsString;
use std::str::FromStr;

use ot_shaper::{BufferFlags, Face, Font};

use font::{
    chain_context, gdef, layout_table, ligature_subst, lookup, mark_base_pos, pair_pos,
    single_subst, FontBuilder,
};

/// A font with just enough layout to exercise each shaping stage.
///
/// GSUB: `liga` f+i, `frac`/`numr`/`dnom`, a `calt` that turns `a` into
/// `a.alt` before `b`, and Arabic `init`/`medi`/`fina`.
/// GPOS: `kern` A+A by -50 and a `mark` attachment of the acute.
pub fn test_font() -> Vec<u8> {
    let mut b = FontBuilder::new(1000);
    b.glyph(".notdef", None, 500);
    let _space = b.glyph("space", Some(0x20), 250);
    let f = b.glyph("f", Some(0x66), 300);
    let i = b.glyph("i", Some(0x69), 250);
    let f_i = b.glyph("f_i", None, 500);
    let cap_a = b.glyph("A", Some(0x41), 600);
    let acute = b.glyph("acutecomb", Some(0x301), 200);
    let dotted_circle = b.glyph("dottedcircle", Some(0x25CC), 500);
    let one = b.glyph("one", Some(0x31), 500);
    let two = b.glyph("two", Some(0x32), 500);
    let slash = b.glyph("slash", Some(0x2F), 300);
    let fraction = b.glyph("fraction", Some(0x2044), 100);
    let one_numr = b.glyph("one.numr", None, 350);
    let two_dnom = b.glyph("two.dnom", None, 350);
    let fraction_frac = b.glyph("fraction.frac", None, 80);
    let a = b.glyph("a", Some(0x61), 500);
    let b_ = b.glyph("b", Some(0x62), 500);
    let a_alt = b.glyph("a.alt", None, 500);
    let kaf = b.glyph("kaf", Some(0x643), 400);
    let teh = b.glyph("teh", Some(0x62A), 410);
    let beh = b.glyph("beh", Some(0x628), 420);
    let kaf_init = b.glyph("kaf.init", None, 300);
    let teh_medi = b.glyph("teh.medi", None, 310);
    let beh_fina = b.glyph("beh.fina", None, 320);

    let scripts = [*b"DFLT", *b"arab", *b"latn"];

    b.table(
        b"GDEF",
        gdef(&[
            (cap_a, cap_a, 1),
            (f_i, f_i, 2),
            (acute, acute, 3),
            (dotted_circle, dotted_circle, 1),
        ]),
    );

    let gsub_lookups = vec![
        lookup(4, 0, vec![ligature_subst(&[f, i], f_i)]),
        lookup(
            1,
            0,
            vec![single_subst(&[(slash, fraction_frac), (fraction, fraction_frac)])],
        ),
        lookup(1, 0, vec![single_subst(&[(one, one_numr)])]),
        lookup(1, 0, vec![single_subst(&[(two, two_dnom)])]),
        lookup(6, 0, vec![chain_context(&[], &[&[a], &[b_]], &[], &[(0, 5)])]),
        lookup(1, 0, vec![single_subst(&[(a, a_alt)])]),
        lookup(1, 0, vec![single_subst(&[(kaf, kaf_init)])]),
        lookup(1, 0, vec![single_subst(&[(teh, teh_medi)])]),
        lookup(1, 0, vec![single_subst(&[(beh, beh_fina)])]),
    ];
    b.table(
        b"GSUB",
        layout_table(
            &scripts,
            &[
                (*b"calt", 4),
                (*b"dnom", 3),
                (*b"fina", 8),
                (*b"frac", 1),
                (*b"init", 6),
                (*b"liga", 0),
                (*b"medi", 7),
                (*b"numr", 2),
            ],
            gsub_lookups,
        ),
    );

    let gpos_lookups = vec![
        lookup(2, 0, vec![pair_pos(cap_a, cap_a, -50)]),
        lookup(
            4,
            0,
            vec![mark_base_pos(
                &[(acute, 100, 500)],
                &[(cap_a, 300, 700), (dotted_circle, 250, 700)],
            )],
        ),
    ];
    b.table(
        b"GPOS",
        layout_table(&scripts, &[(*b"kern", 0), (*b"mark", 1)], gpos_lookups),
    );

    b.build()
}

struct Args {
    direction: Option<ot_shaper::Direction>,
    language: Option<ot_shaper::Language>,
    script: Option<ot_shaper::Script>,
    features: Vec<ot_shaper::Feature>,
    unicodes_before: Option<String>,
    unicodes_after: Option<String>,
    cluster_level: ot_shaper::BufferClusterLevel,
    remove_default_ignorables: bool,
    unsafe_to_concat: bool,
    no_glyph_names: bool,
    no_positions: bool,
    no_advances: bool,
    no_clusters: bool,
    show_flags: bool,
    bot: bool,
    eot: bool,
}

fn parse_args(options: &str) -> Result<Args, pico_args::Error> {
    let args: Vec<OsString> = options
        .split(' ')
        .filter(|s| !s.is_empty())
        .map(OsString::from)
        .collect();
    let mut args = pico_args::Arguments::from_vec(args);

    let parsed = Args {
        direction: args.opt_value_from_str("--direction")?,
        language: args.opt_value_from_str("--language")?,
        script: args.opt_value_from_str("--script")?,
        features: args
            .opt_value_from_fn("--features", parse_features)?
            .unwrap_or_default(),
        unicodes_before: args.opt_value_from_fn("--unicodes-before", parse_unicodes)?,
        unicodes_after: args.opt_value_from_fn("--unicodes-after", parse_unicodes)?,
        cluster_level: args
            .opt_value_from_fn("--cluster-level", parse_cluster)?
            .unwrap_or_default(),
        remove_default_ignorables: args.contains("--remove-default-ignorables"),
        unsafe_to_concat: args.contains("--unsafe-to-concat"),
        no_glyph_names: args.contains("--no-glyph-names"),
        no_positions: args.contains("--no-positions"),
        no_advances: args.contains("--no-advances"),
        no_clusters: args.contains("--no-clusters"),
        show_flags: args.contains("--show-flags"),
        bot: args.contains("--bot"),
        eot: args.contains("--eot"),
    };

    let rest = args.finish();
    assert!(rest.is_empty(), "unknown options: {rest:?}");
    Ok(parsed)
}

fn parse_features(s: &str) -> Result<Vec<ot_shaper::Feature>, String> {
    s.split(',')
        .map(|s| ot_shaper::Feature::from_str(s).map_err(|e| e.to_string()))
        .collect()
}

fn parse_unicodes(s: &str) -> Result<String, String> {
    s.split(',')
        .map(|s| {
            let s = s.strip_prefix("U+").unwrap_or(s);
            let cp = u32::from_str_radix(s, 16).map_err(|e| format!("{e}"))?;
            char::from_u32(cp).ok_or_else(|| format!("{cp:X} is not a valid codepoint"))
        })
        .collect()
}

fn parse_cluster(s: &str) -> Result<ot_shaper::BufferClusterLevel, String> {
    match s {
        "0" => Ok(ot_shaper::BufferClusterLevel::MonotoneGraphemes),
        "1" => Ok(ot_shaper::BufferClusterLevel::MonotoneCharacters),
        "2" => Ok(ot_shaper::BufferClusterLevel::Characters),
        _ => Err("invalid cluster level".to_string()),
    }
}

pub fn shape_buffer(font_data: &[u8], text: &str, options: &str) -> (ot_shaper::GlyphBuffer, String) {
    let _ = env_logger::builder().is_test(true).try_init();

    let args = parse_args(options).unwrap();

    let face = Face::from_slice(font_data, 0).unwrap();
    let font = Font::new(&face);

    let mut buffer = ot_shaper::UnicodeBuffer::new();
    if let Some(ref pre_context) = args.unicodes_before {
        buffer.set_pre_context(pre_context);
    }
    buffer.push_str(text);
    if let Some(ref post_context) = args.unicodes_after {
        buffer.set_post_context(post_context);
    }

    if let Some(d) = args.direction {
        buffer.set_direction(d);
    }

    if let Some(lang) = args.language {
        buffer.set_language(lang);
    }

    if let Some(script) = args.script {
        buffer.set_script(script);
    }

    let mut buffer_flags = BufferFlags::default();
    buffer_flags.set(BufferFlags::BEGINNING_OF_TEXT, args.bot);
    buffer_flags.set(BufferFlags::END_OF_TEXT, args.eot);
    buffer_flags.set(BufferFlags::PRODUCE_UNSAFE_TO_CONCAT, args.unsafe_to_concat);
    buffer_flags.set(
        BufferFlags::REMOVE_DEFAULT_IGNORABLES,
        args.remove_default_ignorables,
    );
    buffer.set_flags(buffer_flags);

    buffer.set_cluster_level(args.cluster_level);
    buffer.guess_segment_properties();

    let glyph_buffer = ot_shaper::shape(&font, &args.features, buffer);

    let mut format_flags = ot_shaper::SerializeFlags::default();
    if args.no_glyph_names {
        format_flags |= ot_shaper::SerializeFlags::NO_GLYPH_NAMES;
    }

    if args.no_clusters {
        format_flags |= ot_shaper::SerializeFlags::NO_CLUSTERS;
    }

    if args.no_positions {
        format_flags |= ot_shaper::SerializeFlags::NO_POSITIONS;
    }

    if args.no_advances {
        format_flags |= ot_shaper::SerializeFlags::NO_ADVANCES;
    }

    if args.show_flags {
        format_flags |= ot_shaper::SerializeFlags::GLYPH_FLAGS;
    }

    let serialized = glyph_buffer.serialize(&font, format_flags);
    (glyph_buffer, serialized)
}

pub fn shape(font_data: &[u8], text: &str, options: &str) -> String {
    shape_buffer(font_data, text, options).1
}
