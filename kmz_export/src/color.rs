//! KML colors are 8 hex digits in `aabbggrr` order, the reverse of the usual `aarrggbb`.

use shared::geocell::Technology;

pub const RED: &str = "ff0000ff";
pub const GREEN: &str = "ff00ff00";
pub const BLUE: &str = "ffff0000";
pub const BLACK: &str = "ff000000";
pub const WHITE: &str = "ffffffff";
pub const ORANGE: &str = "ff00a5ff";
pub const CYAN: &str = "ffffff00";

/// Alpha substituted into polygon fills, about 31% opacity.
pub const POLYGON_ALPHA: &str = "4f";

/// CSS color names, sorted for binary search.
static NAMED_COLORS: &[(&str, &str)] = &[
    ("aliceblue", "fffff8f0"),
    ("antiquewhite", "ffd7ebfa"),
    ("aqua", "ffffff00"),
    ("aquamarine", "ffd4ff7f"),
    ("azure", "fffffff0"),
    ("beige", "ffdcf5f5"),
    ("bisque", "ffc4e4ff"),
    ("black", "ff000000"),
    ("blanchedalmond", "ffcdebff"),
    ("blue", "ffff0000"),
    ("blueviolet", "ffe22b8a"),
    ("brown", "ff2a2aa5"),
    ("burlywood", "ff87b8de"),
    ("cadetblue", "ffa09e5f"),
    ("chartreuse", "ff00ff7f"),
    ("chocolate", "ff1e69d2"),
    ("coral", "ff507fff"),
    ("cornflowerblue", "ffed9564"),
    ("cornsilk", "ffdcf8ff"),
    ("crimson", "ff3c14dc"),
    ("cyan", "ffffff00"),
    ("darkblue", "ff8b0000"),
    ("darkcyan", "ff8b8b00"),
    ("darkgoldenrod", "ff0b86b8"),
    ("darkgray", "ffa9a9a9"),
    ("darkgreen", "ff006400"),
    ("darkgrey", "ffa9a9a9"),
    ("darkkhaki", "ff6bb7bd"),
    ("darkmagenta", "ff8b008b"),
    ("darkolivegreen", "ff2f6b55"),
    ("darkorange", "ff008cff"),
    ("darkorchid", "ffcc3299"),
    ("darkred", "ff00008b"),
    ("darksalmon", "ff7a96e9"),
    ("darkseagreen", "ff8fbc8f"),
    ("darkslateblue", "ff8b3d48"),
    ("darkslategray", "ff4f4f2f"),
    ("darkslategrey", "ff4f4f2f"),
    ("darkturquoise", "ffd1ce00"),
    ("darkviolet", "ffd30094"),
    ("deeppink", "ff9314ff"),
    ("deepskyblue", "ffffbf00"),
    ("dimgray", "ff696969"),
    ("dimgrey", "ff696969"),
    ("dodgerblue", "ffff901e"),
    ("firebrick", "ff2222b2"),
    ("floralwhite", "fff0faff"),
    ("forestgreen", "ff228b22"),
    ("fuchsia", "ffff00ff"),
    ("gainsboro", "ffdcdcdc"),
    ("ghostwhite", "fffff8f8"),
    ("gold", "ff00d7ff"),
    ("goldenrod", "ff20a5da"),
    ("gray", "ff808080"),
    ("green", "ff008000"),
    ("greenyellow", "ff2fffad"),
    ("grey", "ff808080"),
    ("honeydew", "fff0fff0"),
    ("hotpink", "ffb469ff"),
    ("indianred", "ff5c5ccd"),
    ("indigo", "ff82004b"),
    ("ivory", "fff0ffff"),
    ("khaki", "ff8ce6f0"),
    ("lavender", "fffae6e6"),
    ("lavenderblush", "fff5f0ff"),
    ("lawngreen", "ff00fc7c"),
    ("lemonchiffon", "ffcdfaff"),
    ("lightblue", "ffe6d8ad"),
    ("lightcoral", "ff8080f0"),
    ("lightcyan", "ffffffe0"),
    ("lightgoldenrodyellow", "ffd2fafa"),
    ("lightgray", "ffd3d3d3"),
    ("lightgreen", "ff90ee90"),
    ("lightgrey", "ffd3d3d3"),
    ("lightpink", "ffc1b6ff"),
    ("lightsalmon", "ff7aa0ff"),
    ("lightseagreen", "ffaab220"),
    ("lightskyblue", "ffface87"),
    ("lightslategray", "ff998877"),
    ("lightslategrey", "ff998877"),
    ("lightsteelblue", "ffdec4b0"),
    ("lightyellow", "ffe0ffff"),
    ("lime", "ff00ff00"),
    ("limegreen", "ff32cd32"),
    ("linen", "ffe6f0fa"),
    ("magenta", "ffff00ff"),
    ("maroon", "ff000080"),
    ("mediumaquamarine", "ffaacd66"),
    ("mediumblue", "ffcd0000"),
    ("mediumorchid", "ffd355ba"),
    ("mediumpurple", "ffdb7093"),
    ("mediumseagreen", "ff71b33c"),
    ("mediumslateblue", "ffee687b"),
    ("mediumspringgreen", "ff9afa00"),
    ("mediumturquoise", "ffccd148"),
    ("mediumvioletred", "ff8515c7"),
    ("midnightblue", "ff701919"),
    ("mintcream", "fffafff5"),
    ("mistyrose", "ffe1e4ff"),
    ("moccasin", "ffb5e4ff"),
    ("navajowhite", "ffaddeff"),
    ("navy", "ff800000"),
    ("oldlace", "ffe6f5fd"),
    ("olive", "ff008080"),
    ("olivedrab", "ff238e6b"),
    ("orange", "ff00a5ff"),
    ("orangered", "ff0045ff"),
    ("orchid", "ffd670da"),
    ("palegoldenrod", "ffaae8ee"),
    ("palegreen", "ff98fb98"),
    ("paleturquoise", "ffeeeeaf"),
    ("palevioletred", "ff9370db"),
    ("papayawhip", "ffd5efff"),
    ("peachpuff", "ffb9daff"),
    ("peru", "ff3f85cd"),
    ("pink", "ffcbc0ff"),
    ("plum", "ffdda0dd"),
    ("powderblue", "ffe6e0b0"),
    ("purple", "ff800080"),
    ("rebeccapurple", "ff993366"),
    ("red", "ff0000ff"),
    ("rosybrown", "ff8f8fbc"),
    ("royalblue", "ffe16941"),
    ("saddlebrown", "ff13458b"),
    ("salmon", "ff7280fa"),
    ("sandybrown", "ff60a4f4"),
    ("seagreen", "ff578b2e"),
    ("seashell", "ffeef5ff"),
    ("sienna", "ff2d52a0"),
    ("silver", "ffc0c0c0"),
    ("skyblue", "ffebce87"),
    ("slateblue", "ffcd5a6a"),
    ("slategray", "ff908070"),
    ("slategrey", "ff908070"),
    ("snow", "fffafaff"),
    ("springgreen", "ff7fff00"),
    ("steelblue", "ffb48246"),
    ("tan", "ff8cb4d2"),
    ("teal", "ff808000"),
    ("thistle", "ffd8bfd8"),
    ("tomato", "ff4763ff"),
    ("turquoise", "ffd0e040"),
    ("violet", "ffee82ee"),
    ("wheat", "ffb3def5"),
    ("white", "ffffffff"),
    ("whitesmoke", "fff5f5f5"),
    ("yellow", "ff00ffff"),
    ("yellowgreen", "ff32cd9a"),
];

/// Looks up a CSS color name, ignoring case, spaces, dashes and underscores.
/// Unknown names map to red.
pub fn color_for(name: &str) -> &'static str {
    let key: String = name
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();

    NAMED_COLORS
        .binary_search_by(|(candidate, _)| (*candidate).cmp(key.as_str()))
        .map_or(RED, |i| NAMED_COLORS[i].1)
}

/// Replaces the alpha of an `aabbggrr` color with [`POLYGON_ALPHA`].
///
/// A 6 digit `bbggrr` value is treated as fully opaque first. Anything that is
/// not hex falls back to translucent red.
pub fn make_transparent(color: &str) -> String {
    let color = color.trim();
    if !color.chars().all(|c| c.is_ascii_hexdigit()) {
        return format!("{POLYGON_ALPHA}{}", &RED[2..]);
    }

    let bgr = match color.len() {
        6 => color,
        8 => &color[2..],
        _ => return format!("{POLYGON_ALPHA}{}", &RED[2..]),
    };
    format!("{POLYGON_ALPHA}{}", bgr.to_ascii_lowercase())
}

/// Icon color for timeline exports without a CSV color.
pub const fn technology_color(technology: Technology) -> &'static str {
    match technology {
        Technology::Gsm => BLUE,
        Technology::Umts => GREEN,
        Technology::Lte => RED,
        Technology::Nr => BLACK,
        Technology::NbIot | Technology::Unknown(_) => WHITE,
    }
}

/// Icon color for query result exports.
pub fn brand_color(brand: Option<&str>) -> &'static str {
    let Some(brand) = brand else {
        return GREEN;
    };
    if brand.eq_ignore_ascii_case("MEO") {
        BLUE
    } else if brand.eq_ignore_ascii_case("NOS") {
        ORANGE
    } else if brand.eq_ignore_ascii_case("Vodafone") {
        RED
    } else if brand.eq_ignore_ascii_case("DIGI") {
        CYAN
    } else {
        GREEN
    }
}
