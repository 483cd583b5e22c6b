//! Word lists for themed captions.

use rand::{Rng, seq::SliceRandom as _};

/// Topic name that selects the general corpus.
pub const RANDOM_TOPIC: &str = "random";

static TOPICS: &[(&str, &[&str])] = &[
    (
        "animals",
        &[
            "otter", "falcon", "lynx", "heron", "badger", "gecko", "walrus", "panther", "beetle",
            "moose", "salamander", "koala", "viper", "pelican", "bison",
        ],
    ),
    (
        "space",
        &[
            "nebula", "quasar", "orbit", "comet", "pulsar", "galaxy", "eclipse", "meteor",
            "asteroid", "zenith", "cosmos", "supernova", "satellite", "horizon", "gravity",
        ],
    ),
    (
        "food",
        &[
            "noodle", "mango", "biscuit", "pepper", "waffle", "truffle", "olive", "pretzel",
            "dumpling", "saffron", "croissant", "radish", "custard", "lentil", "ginger",
        ],
    ),
    (
        "nature",
        &[
            "canyon", "glacier", "meadow", "thunder", "willow", "delta", "tundra", "lagoon",
            "boulder", "fern", "monsoon", "summit", "marsh", "aurora", "ember",
        ],
    ),
    (
        "tech",
        &[
            "kernel", "socket", "cache", "pixel", "router", "compiler", "buffer", "daemon",
            "firmware", "vector", "thread", "bitmap", "codec", "mutex", "packet",
        ],
    ),
    (
        "emotions",
        &[
            "joy", "awe", "dread", "calm", "longing", "delight", "fury", "wonder", "serenity",
            "nostalgia", "bliss", "angst", "hope", "glee", "melancholy",
        ],
    ),
];

static GENERAL: &[&str] = &[
    "absolute", "acoustic", "adventure", "almanac", "amber", "anchor", "antique", "archive",
    "balance", "ballad", "banner", "barrel", "beacon", "blossom", "bramble", "bridge", "bronze",
    "cabinet", "candle", "carousel", "cascade", "castle", "chalk", "chapter", "circuit", "citadel",
    "clover", "cobalt", "compass", "copper", "corridor", "crystal", "curtain", "dazzle", "drizzle",
    "echo", "elegant", "emerald", "engine", "envelope", "fable", "feather", "festival", "fiddle",
    "flicker", "fortune", "fountain", "fragment", "gadget", "garden", "gazette", "glimmer",
    "granite", "harbor", "harvest", "hollow", "hymn", "icicle", "island", "ivory", "jasmine",
    "jigsaw", "journey", "jubilee", "kaleidoscope", "kettle", "keystone", "lantern", "lattice",
    "ledger", "lemonade", "library", "lullaby", "marble", "mosaic", "motif", "mural", "nectar",
    "needle", "nimbus", "notebook", "oasis", "obsidian", "orchard", "origami", "paddle",
    "paradox", "parcel", "pebble", "pendulum", "pilgrim", "quartz", "quill", "quiver", "radiant",
    "raven", "riddle", "ripple", "saddle", "scarlet", "sequel", "shimmer", "signal", "silhouette",
    "sonnet", "spiral", "sprocket", "tapestry", "tempest", "thimble", "timber", "topaz", "trellis",
    "tundra", "twilight", "umbrella", "utopia", "velvet", "verdict", "vessel", "voyage", "whisper",
    "whistle", "wicker", "window", "wonder", "yarn", "yonder", "zephyr", "zigzag", "zodiac",
];

/// Words of the named topic (case-insensitive). `None` for unknown topics and for
/// [`RANDOM_TOPIC`], which is served by [`general_corpus`].
pub fn topic(name: &str) -> Option<&'static [&'static str]> {
    let name = name.trim();
    TOPICS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, words)| *words)
}

pub fn topic_names() -> impl Iterator<Item = &'static str> {
    TOPICS.iter().map(|(n, _)| *n)
}

/// The general corpus: the built-in word list followed by every topic list.
pub fn general_corpus() -> impl Iterator<Item = &'static str> {
    GENERAL
        .iter()
        .copied()
        .chain(TOPICS.iter().flat_map(|(_, words)| words.iter().copied()))
}

/// Draw one word for `topic_name`. The `random` topic and unknown topics draw from the general
/// corpus; unknown names are logged.
pub fn pick_word<R: Rng + ?Sized>(topic_name: &str, rng: &mut R) -> &'static str {
    if let Some(words) = topic(topic_name)
        && let Some(w) = words.choose(rng)
    {
        return *w;
    }
    if !topic_name.trim().eq_ignore_ascii_case(RANDOM_TOPIC) {
        tracing::warn!(topic = topic_name, "unknown word topic, using general corpus");
    }
    let total = general_corpus().count();
    let idx = rng.gen_range(0..total);
    general_corpus().nth(idx).unwrap_or("slidewave")
}

#[cfg(test)]
#[path = "../../tests/unit/resources/words.rs"]
mod tests;
