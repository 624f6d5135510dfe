//! A tiny in-memory font compiler.
//!
//! Enough of the OpenType binary format to describe the layout features the
//! shaping tests need: a table directory, the required metric tables, a
//! format 4 `cmap`, `post` glyph names, optional `glyf` outlines and
//! vertical metrics, and hand-assembled GDEF/GSUB/GPOS.

pub type GlyphId = u16;

/// One field of a table header.
#[derive(Clone, Copy)]
pub enum Field {
    U16(u16),
    I16(i16),
    U32(u32),
    Tag([u8; 4]),
    /// An Offset16 to the child with this index, relative to the table start.
    Off(usize),
    /// Like `Off`, as an Offset32.
    Off32(usize),
}

impl Field {
    fn len(&self) -> usize {
        match self {
            Field::U16(_) | Field::I16(_) | Field::Off(_) => 2,
            Field::U32(_) | Field::Tag(_) | Field::Off32(_) => 4,
        }
    }
}

/// Serializes a header followed by its child tables.
pub fn table(fields: &[Field], children: &[Vec<u8>]) -> Vec<u8> {
    let header_len: usize = fields.iter().map(Field::len).sum();
    let mut starts = Vec::with_capacity(children.len());
    let mut pos = header_len;
    for child in children {
        starts.push(pos);
        pos += child.len();
    }

    let mut out = Vec::with_capacity(pos);
    for field in fields {
        match *field {
            Field::U16(v) => out.extend_from_slice(&v.to_be_bytes()),
            Field::I16(v) => out.extend_from_slice(&v.to_be_bytes()),
            Field::U32(v) => out.extend_from_slice(&v.to_be_bytes()),
            Field::Tag(v) => out.extend_from_slice(&v),
            Field::Off(i) => {
                let offset = u16::try_from(starts[i]).expect("offset overflow");
                out.extend_from_slice(&offset.to_be_bytes());
            }
            Field::Off32(i) => out.extend_from_slice(&(starts[i] as u32).to_be_bytes()),
        }
    }
    for child in children {
        out.extend_from_slice(child);
    }
    out
}

fn u16s(values: impl IntoIterator<Item = u16>) -> Vec<Field> {
    values.into_iter().map(Field::U16).collect()
}

pub fn coverage(glyphs: &[GlyphId]) -> Vec<u8> {
    let mut sorted = glyphs.to_vec();
    sorted.sort_unstable();
    let mut fields = vec![Field::U16(1), Field::U16(sorted.len() as u16)];
    fields.extend(u16s(sorted));
    table(&fields, &[])
}

/// A format 2 class definition from `(first, last, class)` ranges.
pub fn class_def(ranges: &[(GlyphId, GlyphId, u16)]) -> Vec<u8> {
    let mut sorted = ranges.to_vec();
    sorted.sort_unstable();
    let mut fields = vec![Field::U16(2), Field::U16(sorted.len() as u16)];
    for (first, last, class) in sorted {
        fields.extend([Field::U16(first), Field::U16(last), Field::U16(class)]);
    }
    table(&fields, &[])
}

pub fn lookup(kind: u16, flag: u16, subtables: Vec<Vec<u8>>) -> Vec<u8> {
    let mut fields = vec![
        Field::U16(kind),
        Field::U16(flag),
        Field::U16(subtables.len() as u16),
    ];
    fields.extend((0..subtables.len()).map(Field::Off));
    table(&fields, &subtables)
}

/// A GSUB or GPOS table where every script's default language system
/// enables every feature. Each feature references one lookup.
pub fn layout_table(
    scripts: &[[u8; 4]],
    features: &[([u8; 4], u16)],
    lookups: Vec<Vec<u8>>,
) -> Vec<u8> {
    let mut langsys = vec![
        Field::U16(0),
        Field::U16(0xFFFF),
        Field::U16(features.len() as u16),
    ];
    langsys.extend(u16s(0..features.len() as u16));
    let langsys = table(&langsys, &[]);
    let script = table(&[Field::Off(0), Field::U16(0)], &[langsys]);

    let mut sorted_scripts = scripts.to_vec();
    sorted_scripts.sort_unstable();
    let mut script_list = vec![Field::U16(sorted_scripts.len() as u16)];
    for (i, &tag) in sorted_scripts.iter().enumerate() {
        script_list.extend([Field::Tag(tag), Field::Off(i)]);
    }
    let script_list = table(&script_list, &vec![script; sorted_scripts.len()]);

    let mut feature_list = vec![Field::U16(features.len() as u16)];
    let mut feature_tables = Vec::new();
    for (i, &(tag, lookup_index)) in features.iter().enumerate() {
        feature_list.extend([Field::Tag(tag), Field::Off(i)]);
        let feature = [Field::U16(0), Field::U16(1), Field::U16(lookup_index)];
        feature_tables.push(table(&feature, &[]));
    }
    let feature_list = table(&feature_list, &feature_tables);

    let mut lookup_list = vec![Field::U16(lookups.len() as u16)];
    lookup_list.extend((0..lookups.len()).map(Field::Off));
    let lookup_list = table(&lookup_list, &lookups);

    table(
        &[
            Field::U16(1),
            Field::U16(0),
            Field::Off(0),
            Field::Off(1),
            Field::Off(2),
        ],
        &[script_list, feature_list, lookup_list],
    )
}

/// GSUB type 1, format 2.
pub fn single_subst(pairs: &[(GlyphId, GlyphId)]) -> Vec<u8> {
    let mut sorted = pairs.to_vec();
    sorted.sort_unstable();
    let firsts: Vec<_> = sorted.iter().map(|&(g, _)| g).collect();
    let mut fields = vec![Field::U16(2), Field::Off(0), Field::U16(sorted.len() as u16)];
    fields.extend(u16s(sorted.iter().map(|&(_, s)| s)));
    table(&fields, &[coverage(&firsts)])
}

/// GSUB type 4 with a single ligature.
pub fn ligature_subst(components: &[GlyphId], ligature: GlyphId) -> Vec<u8> {
    let mut lig = vec![Field::U16(ligature), Field::U16(components.len() as u16)];
    lig.extend(u16s(components[1..].iter().copied()));
    let lig = table(&lig, &[]);
    let lig_set = table(&[Field::U16(1), Field::Off(0)], &[lig]);
    table(
        &[Field::U16(1), Field::Off(0), Field::U16(1), Field::Off(1)],
        &[coverage(&components[..1]), lig_set],
    )
}

/// GSUB type 6, format 3. `records` are `(sequence index, lookup index)`.
pub fn chain_context(
    backtrack: &[&[GlyphId]],
    input: &[&[GlyphId]],
    lookahead: &[&[GlyphId]],
    records: &[(u16, u16)],
) -> Vec<u8> {
    let mut fields = vec![Field::U16(3)];
    let mut children = Vec::new();
    for sequence in [backtrack, input, lookahead] {
        fields.push(Field::U16(sequence.len() as u16));
        for glyphs in sequence {
            fields.push(Field::Off(children.len()));
            children.push(coverage(glyphs));
        }
    }
    fields.push(Field::U16(records.len() as u16));
    for &(sequence_index, lookup_index) in records {
        fields.extend([Field::U16(sequence_index), Field::U16(lookup_index)]);
    }
    table(&fields, &children)
}

/// GPOS type 2, format 1, adjusting the advance of the first glyph.
pub fn pair_pos(first: GlyphId, second: GlyphId, x_advance: i16) -> Vec<u8> {
    let pair_set = table(
        &[Field::U16(1), Field::U16(second), Field::I16(x_advance)],
        &[],
    );
    table(
        &[
            Field::U16(1),
            Field::Off(0),
            Field::U16(0x0004),
            Field::U16(0),
            Field::U16(1),
            Field::Off(1),
        ],
        &[coverage(&[first]), pair_set],
    )
}

pub fn anchor(x: i16, y: i16) -> Vec<u8> {
    table(&[Field::U16(1), Field::I16(x), Field::I16(y)], &[])
}

/// An anchor that snaps to an outline point when hinting.
pub fn anchor_point(x: i16, y: i16, point: u16) -> Vec<u8> {
    table(
        &[Field::U16(2), Field::I16(x), Field::I16(y), Field::U16(point)],
        &[],
    )
}

/// GPOS type 4 (mark-to-base) or 6 (mark-to-mark), format 1, with a single
/// mark class.
pub fn mark_attachment(marks: &[(GlyphId, Vec<u8>)], bases: &[(GlyphId, Vec<u8>)]) -> Vec<u8> {
    let mut marks = marks.to_vec();
    marks.sort_by_key(|(g, _)| *g);
    let mut bases = bases.to_vec();
    bases.sort_by_key(|(g, _)| *g);

    let mut mark_array = vec![Field::U16(marks.len() as u16)];
    for i in 0..marks.len() {
        mark_array.extend([Field::U16(0), Field::Off(i)]);
    }
    let mark_anchors: Vec<_> = marks.iter().map(|(_, a)| a.clone()).collect();
    let mark_array = table(&mark_array, &mark_anchors);

    let mut base_array = vec![Field::U16(bases.len() as u16)];
    base_array.extend((0..bases.len()).map(Field::Off));
    let base_anchors: Vec<_> = bases.iter().map(|(_, a)| a.clone()).collect();
    let base_array = table(&base_array, &base_anchors);

    let mark_glyphs: Vec<_> = marks.iter().map(|(g, _)| *g).collect();
    let base_glyphs: Vec<_> = bases.iter().map(|(g, _)| *g).collect();
    table(
        &[
            Field::U16(1),
            Field::Off(0),
            Field::Off(1),
            Field::U16(1),
            Field::Off(2),
            Field::Off(3),
        ],
        &[
            coverage(&mark_glyphs),
            coverage(&base_glyphs),
            mark_array,
            base_array,
        ],
    )
}

/// GPOS type 4, format 1, with a single mark class.
pub fn mark_base_pos(marks: &[(GlyphId, i16, i16)], bases: &[(GlyphId, i16, i16)]) -> Vec<u8> {
    let anchored = |glyphs: &[(GlyphId, i16, i16)]| -> Vec<(GlyphId, Vec<u8>)> {
        glyphs.iter().map(|&(g, x, y)| (g, anchor(x, y))).collect()
    };
    mark_attachment(&anchored(marks), &anchored(bases))
}

/// GPOS type 5, format 1, with a single mark class. Each ligature lists
/// one anchor per component.
pub fn mark_lig_pos(marks: &[(GlyphId, i16, i16)], ligatures: &[(GlyphId, &[(i16, i16)])]) -> Vec<u8> {
    let mut marks = marks.to_vec();
    marks.sort_unstable();
    let mut ligatures = ligatures.to_vec();
    ligatures.sort_by_key(|&(g, _)| g);

    let mut mark_array = vec![Field::U16(marks.len() as u16)];
    for i in 0..marks.len() {
        mark_array.extend([Field::U16(0), Field::Off(i)]);
    }
    let mark_anchors: Vec<_> = marks.iter().map(|&(_, x, y)| anchor(x, y)).collect();
    let mark_array = table(&mark_array, &mark_anchors);

    let attaches: Vec<_> = ligatures
        .iter()
        .map(|&(_, components)| {
            let mut fields = vec![Field::U16(components.len() as u16)];
            fields.extend((0..components.len()).map(Field::Off));
            let anchors: Vec<_> = components.iter().map(|&(x, y)| anchor(x, y)).collect();
            table(&fields, &anchors)
        })
        .collect();
    let mut lig_array = vec![Field::U16(attaches.len() as u16)];
    lig_array.extend((0..attaches.len()).map(Field::Off));
    let lig_array = table(&lig_array, &attaches);

    let mark_glyphs: Vec<_> = marks.iter().map(|&(g, _, _)| g).collect();
    let lig_glyphs: Vec<_> = ligatures.iter().map(|&(g, _)| g).collect();
    table(
        &[
            Field::U16(1),
            Field::Off(0),
            Field::Off(1),
            Field::U16(1),
            Field::Off(2),
            Field::Off(3),
        ],
        &[
            coverage(&mark_glyphs),
            coverage(&lig_glyphs),
            mark_array,
            lig_array,
        ],
    )
}

/// GPOS type 3, format 1. Each glyph has an optional entry and exit anchor.
pub fn cursive_pos(glyphs: &[(GlyphId, Option<(i16, i16)>, Option<(i16, i16)>)]) -> Vec<u8> {
    let mut sorted = glyphs.to_vec();
    sorted.sort_by_key(|&(g, _, _)| g);

    let mut fields = vec![Field::U16(1), Field::Off(0), Field::U16(sorted.len() as u16)];
    let mut children = vec![coverage(
        &sorted.iter().map(|&(g, _, _)| g).collect::<Vec<_>>(),
    )];
    for &(_, entry, exit) in &sorted {
        for point in [entry, exit] {
            match point {
                Some((x, y)) => {
                    fields.push(Field::Off(children.len()));
                    children.push(anchor(x, y));
                }
                None => fields.push(Field::U16(0)),
            }
        }
    }
    table(&fields, &children)
}

/// GPOS type 2, format 2, adjusting the advance of the first glyph by class.
/// `advances[c1][c2]` applies to a first glyph of class `c1` followed by a
/// second glyph of class `c2`.
pub fn pair_pos_class(
    first_classes: &[(GlyphId, GlyphId, u16)],
    second_classes: &[(GlyphId, GlyphId, u16)],
    advances: &[&[i16]],
) -> Vec<u8> {
    let firsts: Vec<GlyphId> = first_classes
        .iter()
        .flat_map(|&(first, last, _)| first..=last)
        .collect();
    let class2_count = advances.first().map_or(0, |row| row.len());
    let mut fields = vec![
        Field::U16(2),
        Field::Off(0),
        Field::U16(0x0004),
        Field::U16(0),
        Field::Off(1),
        Field::Off(2),
        Field::U16(advances.len() as u16),
        Field::U16(class2_count as u16),
    ];
    for row in advances {
        fields.extend(row.iter().map(|&v| Field::I16(v)));
    }
    table(
        &fields,
        &[
            coverage(&firsts),
            class_def(first_classes),
            class_def(second_classes),
        ],
    )
}

/// GPOS type 1, format 1, adding `x_advance` plus a device adjustment to
/// every covered glyph. `device` is a Device or VariationIndex table.
pub fn single_pos_with_device(glyphs: &[GlyphId], x_advance: i16, device: Vec<u8>) -> Vec<u8> {
    table(
        &[
            Field::U16(1),
            Field::Off(0),
            Field::U16(0x0004 | 0x0040),
            Field::I16(x_advance),
            Field::Off(1),
        ],
        &[coverage(glyphs), device],
    )
}

/// A hinting device table with 4-bit deltas for `start..start + deltas.len()`
/// ppem sizes.
pub fn device(start: u16, deltas: &[i8]) -> Vec<u8> {
    let end = start + deltas.len() as u16 - 1;
    let mut fields = vec![Field::U16(start), Field::U16(end), Field::U16(2)];
    for chunk in deltas.chunks(4) {
        let mut word = 0u16;
        for (i, &delta) in chunk.iter().enumerate() {
            word |= ((delta as u16) & 0xF) << (12 - 4 * i);
        }
        fields.push(Field::U16(word));
    }
    table(&fields, &[])
}

/// A VariationIndex table pointing into the GDEF item variation store.
pub fn variation_index(outer: u16, inner: u16) -> Vec<u8> {
    table(
        &[Field::U16(outer), Field::U16(inner), Field::U16(0x8000)],
        &[],
    )
}

/// GSUB type 2, format 1.
pub fn multiple_subst(sequences: &[(GlyphId, &[GlyphId])]) -> Vec<u8> {
    let mut sorted = sequences.to_vec();
    sorted.sort_by_key(|&(g, _)| g);
    let firsts: Vec<_> = sorted.iter().map(|&(g, _)| g).collect();
    let mut fields = vec![Field::U16(1), Field::Off(0), Field::U16(sorted.len() as u16)];
    let mut children = vec![coverage(&firsts)];
    for &(_, sequence) in &sorted {
        fields.push(Field::Off(children.len()));
        let mut seq = vec![Field::U16(sequence.len() as u16)];
        seq.extend(u16s(sequence.iter().copied()));
        children.push(table(&seq, &[]));
    }
    table(&fields, &children)
}

/// GSUB type 3, format 1.
pub fn alternate_subst(alternates: &[(GlyphId, &[GlyphId])]) -> Vec<u8> {
    // The same layout as a multiple substitution.
    multiple_subst(alternates)
}

/// GSUB type 8, format 1. `substitutes` are `(input, output)` pairs.
pub fn reverse_chain_subst(
    backtrack: &[&[GlyphId]],
    lookahead: &[&[GlyphId]],
    substitutes: &[(GlyphId, GlyphId)],
) -> Vec<u8> {
    let mut sorted = substitutes.to_vec();
    sorted.sort_unstable();
    let inputs: Vec<_> = sorted.iter().map(|&(g, _)| g).collect();

    let mut fields = vec![Field::U16(1), Field::Off(0)];
    let mut children = vec![coverage(&inputs)];
    for sequence in [backtrack, lookahead] {
        fields.push(Field::U16(sequence.len() as u16));
        for glyphs in sequence {
            fields.push(Field::Off(children.len()));
            children.push(coverage(glyphs));
        }
    }
    fields.push(Field::U16(sorted.len() as u16));
    fields.extend(u16s(sorted.iter().map(|&(_, s)| s)));
    table(&fields, &children)
}

fn sequence_rule(input: &[u16], records: &[(u16, u16)]) -> Vec<u8> {
    let mut fields = vec![
        Field::U16(input.len() as u16 + 1),
        Field::U16(records.len() as u16),
    ];
    fields.extend(u16s(input.iter().copied()));
    for &(sequence_index, lookup_index) in records {
        fields.extend([Field::U16(sequence_index), Field::U16(lookup_index)]);
    }
    table(&fields, &[])
}

/// GSUB type 5 (or GPOS type 7), format 1, with one rule per first glyph.
/// `input` lists the glyphs after the first one.
pub fn context_glyphs(rules: &[(GlyphId, &[GlyphId], &[(u16, u16)])]) -> Vec<u8> {
    let mut sorted = rules.to_vec();
    sorted.sort_by_key(|&(g, _, _)| g);
    let firsts: Vec<_> = sorted.iter().map(|&(g, _, _)| g).collect();

    let mut fields = vec![Field::U16(1), Field::Off(0), Field::U16(sorted.len() as u16)];
    let mut children = vec![coverage(&firsts)];
    for &(_, input, records) in &sorted {
        fields.push(Field::Off(children.len()));
        children.push(table(
            &[Field::U16(1), Field::Off(0)],
            &[sequence_rule(input, records)],
        ));
    }
    table(&fields, &children)
}

/// GSUB type 5 (or GPOS type 7), format 2. `rules` are
/// `(first class, following classes, records)`; classes without a rule get
/// a null rule set.
pub fn context_classes(
    coverage_glyphs: &[GlyphId],
    classes: &[(GlyphId, GlyphId, u16)],
    rules: &[(u16, &[u16], &[(u16, u16)])],
) -> Vec<u8> {
    let class_count = classes.iter().map(|&(_, _, c)| c).max().unwrap_or(0) + 1;
    let mut fields = vec![
        Field::U16(2),
        Field::Off(0),
        Field::Off(1),
        Field::U16(class_count),
    ];
    let mut children = vec![coverage(coverage_glyphs), class_def(classes)];
    for class in 0..class_count {
        match rules.iter().find(|&&(c, _, _)| c == class) {
            Some(&(_, input, records)) => {
                fields.push(Field::Off(children.len()));
                children.push(table(
                    &[Field::U16(1), Field::Off(0)],
                    &[sequence_rule(input, records)],
                ));
            }
            None => fields.push(Field::U16(0)),
        }
    }
    table(&fields, &children)
}

/// A version 1.0 GDEF with only glyph classes.
pub fn gdef(classes: &[(GlyphId, GlyphId, u16)]) -> Vec<u8> {
    table(
        &[
            Field::U16(1),
            Field::U16(0),
            Field::Off(0),
            Field::U16(0),
            Field::U16(0),
            Field::U16(0),
        ],
        &[class_def(classes)],
    )
}

/// A version 1.3 GDEF with glyph classes and an item variation store over
/// one axis. The store has a single region peaking at the axis maximum, and
/// `deltas` are the items of its only variation data.
pub fn gdef_with_variations(classes: &[(GlyphId, GlyphId, u16)], deltas: &[i16]) -> Vec<u8> {
    let region_list = table(
        &[
            Field::U16(1),
            Field::U16(1),
            Field::I16(0),
            Field::I16(0x4000),
            Field::I16(0x4000),
        ],
        &[],
    );
    let mut data = vec![
        Field::U16(deltas.len() as u16),
        Field::U16(1),
        Field::U16(1),
        Field::U16(0),
    ];
    data.extend(deltas.iter().map(|&d| Field::I16(d)));
    let data = table(&data, &[]);
    let store = table(
        &[Field::U16(1), Field::Off32(0), Field::U16(1), Field::Off32(1)],
        &[region_list, data],
    );
    table(
        &[
            Field::U16(1),
            Field::U16(3),
            Field::Off(0),
            Field::U16(0),
            Field::U16(0),
            Field::U16(0),
            Field::U16(0),
            Field::Off32(1),
        ],
        &[class_def(classes), store],
    )
}

/// An `fvar` table with one axis from `min` to `max`, defaulting to `min`.
pub fn fvar(tag: [u8; 4], min: i16, max: i16) -> Vec<u8> {
    let fixed = |v: i16| Field::U32((i32::from(v) << 16) as u32);
    table(
        &[
            Field::U16(1),
            Field::U16(0),
            Field::U16(16),
            Field::U16(2),
            Field::U16(1),
            Field::U16(20),
            Field::U16(0),
            Field::U16(8),
            Field::Tag(tag),
            fixed(min),
            fixed(min),
            fixed(max),
            Field::U16(0),
            Field::U16(256),
        ],
        &[],
    )
}

/// A `VORG` table with a default vertical origin and per-glyph overrides.
pub fn vorg(default: i16, origins: &[(GlyphId, i16)]) -> Vec<u8> {
    let mut sorted = origins.to_vec();
    sorted.sort_unstable();
    let mut fields = vec![
        Field::U16(1),
        Field::U16(0),
        Field::I16(default),
        Field::U16(sorted.len() as u16),
    ];
    for (gid, y) in sorted {
        fields.extend([Field::U16(gid), Field::I16(y)]);
    }
    table(&fields, &[])
}

/// A simple `glyf` glyph with one contour through `points`, all on-curve.
fn simple_glyph(points: &[(i16, i16)]) -> Vec<u8> {
    if points.is_empty() {
        return Vec::new();
    }
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);
    let mut out = table(
        &[
            Field::I16(1),
            Field::I16(x_min),
            Field::I16(y_min),
            Field::I16(x_max),
            Field::I16(y_max),
            Field::U16(points.len() as u16 - 1),
            Field::U16(0),
        ],
        &[],
    );
    // On-curve, with long x and y deltas.
    out.extend(points.iter().map(|_| 0x01u8));
    for coords in [
        points.iter().map(|p| p.0).collect::<Vec<_>>(),
        points.iter().map(|p| p.1).collect(),
    ] {
        let mut prev = 0i16;
        for v in coords {
            out.extend_from_slice(&(v - prev).to_be_bytes());
            prev = v;
        }
    }
    // Keeps every offset even for a short `loca`.
    while out.len() % 4 != 0 {
        out.push(0);
    }
    out
}

pub struct Glyph {
    pub name: &'static str,
    pub codepoint: Option<u32>,
    pub advance: u16,
    pub outline: Vec<(i16, i16)>,
    /// Advance height and top side bearing.
    pub vertical: Option<(u16, i16)>,
}

pub struct FontBuilder {
    pub units_per_em: u16,
    pub glyphs: Vec<Glyph>,
    tables: Vec<([u8; 4], Vec<u8>)>,
}

impl FontBuilder {
    pub fn new(units_per_em: u16) -> Self {
        FontBuilder {
            units_per_em,
            glyphs: Vec::new(),
            tables: Vec::new(),
        }
    }

    pub fn glyph(&mut self, name: &'static str, codepoint: Option<u32>, advance: u16) -> GlyphId {
        self.glyphs.push(Glyph {
            name,
            codepoint,
            advance,
            outline: Vec::new(),
            vertical: None,
        });
        (self.glyphs.len() - 1) as GlyphId
    }

    /// Gives a glyph a one-contour `glyf` outline.
    pub fn outline(&mut self, glyph: GlyphId, points: &[(i16, i16)]) {
        self.glyphs[usize::from(glyph)].outline = points.to_vec();
    }

    /// Gives a glyph `vmtx` metrics. Glyphs without them get an advance of
    /// one em and a zero top side bearing.
    pub fn vertical_metrics(&mut self, glyph: GlyphId, advance: u16, top_side_bearing: i16) {
        self.glyphs[usize::from(glyph)].vertical = Some((advance, top_side_bearing));
    }

    pub fn table(&mut self, tag: &[u8; 4], data: Vec<u8>) {
        self.tables.push((*tag, data));
    }

    pub fn build(mut self) -> Vec<u8> {
        let num_glyphs = self.glyphs.len() as u16;
        let max_advance = self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0);

        let head = table(
            &[
                Field::U16(1),
                Field::U16(0),
                Field::U32(0x0001_0000),
                Field::U32(0),
                Field::U32(0x5F0F_3CF5),
                Field::U16(0),
                Field::U16(self.units_per_em),
                Field::U32(0),
                Field::U32(0),
                Field::U32(0),
                Field::U32(0),
                Field::I16(0),
                Field::I16(-200),
                Field::I16(max_advance as i16),
                Field::I16(800),
                Field::U16(0),
                Field::U16(8),
                Field::I16(2),
                Field::I16(0),
                Field::I16(0),
            ],
            &[],
        );

        let hhea = table(
            &[
                Field::U16(1),
                Field::U16(0),
                Field::I16(800),
                Field::I16(-200),
                Field::I16(0),
                Field::U16(max_advance),
                Field::I16(0),
                Field::I16(0),
                Field::I16(max_advance as i16),
                Field::I16(1),
                Field::I16(0),
                Field::I16(0),
                Field::I16(0),
                Field::I16(0),
                Field::I16(0),
                Field::I16(0),
                Field::I16(0),
                Field::U16(num_glyphs),
            ],
            &[],
        );

        let maxp = table(&[Field::U32(0x0000_5000), Field::U16(num_glyphs)], &[]);

        let mut hmtx = Vec::new();
        for glyph in &self.glyphs {
            hmtx.extend([Field::U16(glyph.advance), Field::I16(0)]);
        }
        let hmtx = table(&hmtx, &[]);

        let mut os2 = vec![
            Field::U16(0),
            Field::I16(500),
            Field::U16(400),
            Field::U16(5),
            Field::U16(0),
        ];
        os2.extend([Field::I16(0); 11]);
        os2.extend([Field::U16(0); 5]);
        os2.extend([
            Field::U32(0),
            Field::U32(0),
            Field::U32(0),
            Field::U32(0),
            Field::Tag(*b"TEST"),
            Field::U16(0x0040),
            Field::U16(0x0020),
            Field::U16(0xFFFF),
            Field::I16(800),
            Field::I16(-200),
            Field::I16(0),
            Field::U16(800),
            Field::U16(200),
        ]);
        let os2 = table(&os2, &[]);

        let mut post = vec![
            Field::U32(0x0002_0000),
            Field::U32(0),
            Field::I16(-100),
            Field::I16(50),
            Field::U32(0),
            Field::U32(0),
            Field::U32(0),
            Field::U32(0),
            Field::U32(0),
            Field::U16(num_glyphs),
        ];
        let mut names = Vec::new();
        let mut next_index = 258;
        for glyph in &self.glyphs {
            if glyph.name == ".notdef" {
                post.push(Field::U16(0));
            } else {
                post.push(Field::U16(next_index));
                next_index += 1;
                names.push(glyph.name.len() as u8);
                names.extend_from_slice(glyph.name.as_bytes());
            }
        }
        let mut post = table(&post, &[]);
        post.extend_from_slice(&names);

        let cmap = self.cmap();

        if self.glyphs.iter().any(|g| !g.outline.is_empty()) {
            let mut glyf = Vec::new();
            let mut loca = vec![Field::U16(0)];
            for glyph in &self.glyphs {
                glyf.extend(simple_glyph(&glyph.outline));
                loca.push(Field::U16((glyf.len() / 2) as u16));
            }
            let loca = table(&loca, &[]);
            self.table(b"glyf", glyf);
            self.table(b"loca", loca);
        }

        if self.glyphs.iter().any(|g| g.vertical.is_some()) {
            let upem = self.units_per_em;
            let metrics: Vec<(u16, i16)> = self
                .glyphs
                .iter()
                .map(|g| g.vertical.unwrap_or((upem, 0)))
                .collect();
            let max_advance = metrics.iter().map(|m| m.0).max().unwrap_or(0);
            let mut vhea = vec![
                Field::U32(0x0001_1000),
                Field::I16(500),
                Field::I16(-500),
                Field::I16(0),
                Field::U16(max_advance),
            ];
            vhea.extend([Field::I16(0); 6]);
            vhea.extend([Field::I16(0); 4]);
            vhea.extend([Field::I16(0), Field::U16(num_glyphs)]);
            let vhea = table(&vhea, &[]);
            let mut vmtx = Vec::new();
            for (advance, tsb) in metrics {
                vmtx.extend([Field::U16(advance), Field::I16(tsb)]);
            }
            let vmtx = table(&vmtx, &[]);
            self.table(b"vhea", vhea);
            self.table(b"vmtx", vmtx);
        }

        self.table(b"head", head);
        self.table(b"hhea", hhea);
        self.table(b"maxp", maxp);
        self.table(b"hmtx", hmtx);
        self.table(b"OS/2", os2);
        self.table(b"post", post);
        self.table(b"cmap", cmap);
        self.assemble()
    }

    fn cmap(&self) -> Vec<u8> {
        let mut mapping: Vec<(u16, u16)> = self
            .glyphs
            .iter()
            .enumerate()
            .filter_map(|(gid, g)| Some((u16::try_from(g.codepoint?).ok()?, gid as u16)))
            .collect();
        mapping.sort_unstable();
        mapping.push((0xFFFF, 1));

        let seg_count = mapping.len() as u16;
        let search_range = 2 * (1u16 << (15 - seg_count.leading_zeros()));
        let entry_selector = (search_range / 2).trailing_zeros() as u16;

        let mut subtable = vec![
            Field::U16(4),
            Field::U16(16 + 8 * seg_count),
            Field::U16(0),
            Field::U16(seg_count * 2),
            Field::U16(search_range),
            Field::U16(entry_selector),
            Field::U16(seg_count * 2 - search_range),
        ];
        subtable.extend(u16s(mapping.iter().map(|&(cp, _)| cp)));
        subtable.push(Field::U16(0));
        subtable.extend(u16s(mapping.iter().map(|&(cp, _)| cp)));
        subtable.extend(u16s(mapping.iter().map(|&(cp, gid)| {
            if cp == 0xFFFF {
                1
            } else {
                gid.wrapping_sub(cp)
            }
        })));
        subtable.extend(u16s(mapping.iter().map(|_| 0)));
        let subtable = table(&subtable, &[]);

        let mut cmap = table(
            &[
                Field::U16(0),
                Field::U16(1),
                Field::U16(3),
                Field::U16(1),
                Field::U32(12),
            ],
            &[],
        );
        cmap.extend_from_slice(&subtable);
        cmap
    }

    fn assemble(mut self) -> Vec<u8> {
        self.tables.sort_by(|a, b| a.0.cmp(&b.0));

        let num_tables = self.tables.len() as u16;
        let search_range = 16 * (1u16 << (15 - num_tables.leading_zeros()));
        let entry_selector = (search_range / 16).trailing_zeros() as u16;

        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&search_range.to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&(num_tables * 16 - search_range).to_be_bytes());

        let mut offset = 12 + 16 * self.tables.len();
        let mut data = Vec::new();
        for (tag, table) in &self.tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(table.len() as u32).to_be_bytes());

            data.extend_from_slice(table);
            while data.len() % 4 != 0 {
                data.push(0);
            }
            offset = 12 + 16 * self.tables.len() + data.len();
        }

        out.extend_from_slice(&data);
        out
    }
}
