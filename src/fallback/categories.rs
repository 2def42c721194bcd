//! Category vocabularies
//!
//! Static word pools grouped into disjoint semantic buckets. A replacement is
//! always drawn from a different bucket than the word it replaces, which is
//! what makes the pairing funny.

use serde::{Deserialize, Serialize};

use crate::registry::{tokens, NormalizedWord};

// ============================================================================
// Category Enum
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Animals,
    Foods,
    Kitchenware,
    Household,
    Instruments,
    Vehicles,
    Characters,
    Places,
    /// Nothing matched. Has no vocabulary of its own.
    Generic,
}

impl Category {
    /// Categories that carry candidate words
    pub fn vocabulary() -> &'static [Category] {
        &[
            Self::Animals,
            Self::Foods,
            Self::Kitchenware,
            Self::Household,
            Self::Instruments,
            Self::Vehicles,
            Self::Characters,
            Self::Places,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Animals => "Animals",
            Self::Foods => "Foods",
            Self::Kitchenware => "Kitchenware",
            Self::Household => "Household Objects",
            Self::Instruments => "Musical Instruments",
            Self::Vehicles => "Vehicles",
            Self::Characters => "Characters",
            Self::Places => "Places",
            Self::Generic => "Generic",
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, Self::Generic)
    }

    /// Mimeable candidate words
    pub fn words(&self) -> &'static [&'static str] {
        match self {
            Self::Animals => &[
                "tiger", "elephant", "giraffe", "penguin", "kangaroo", "octopus", "flamingo",
                "gorilla", "crocodile", "dolphin", "peacock", "hedgehog", "golden retriever",
                "eagle", "owl", "camel", "zebra", "squirrel", "lobster", "jellyfish", "koala",
                "rhinoceros", "panda", "walrus", "ostrich", "chameleon", "sloth", "porcupine",
            ],
            Self::Foods => &[
                "spaghetti", "pizza", "banana", "pineapple", "hot dog", "pancake", "watermelon",
                "burrito", "cupcake", "popcorn", "broccoli", "lollipop", "sushi", "pretzel",
                "taco", "doughnut", "cheeseburger", "corn on the cob", "ice cream cone", "lemon",
                "coconut", "marshmallow", "waffle", "carrot", "birthday cake",
            ],
            Self::Kitchenware => &[
                "oven mitt", "frying pan", "rolling pin", "whisk", "spatula", "ladle",
                "cheese grater", "blender", "teapot", "colander", "measuring cup",
                "cutting board", "toaster", "oven", "kettle", "tongs", "pepper grinder",
                "can opener", "mixing bowl", "apron", "saucepan", "corkscrew",
            ],
            Self::Household => &[
                "vacuum cleaner", "umbrella", "toothbrush", "hairdryer", "alarm clock", "ladder",
                "bathtub", "doorbell", "lamp", "pillow", "broom", "mirror", "curtain",
                "bookshelf", "remote control", "hammock", "ironing board", "laundry basket",
                "rocking chair", "garden hose", "wheelbarrow", "light bulb",
            ],
            Self::Instruments => &[
                "trumpet", "violin", "drum kit", "harmonica", "accordion", "tuba", "banjo",
                "saxophone", "xylophone", "bagpipes", "tambourine", "cello", "flute", "ukulele",
                "harp", "piano", "maracas", "trombone", "bongo drums", "electric guitar",
            ],
            Self::Vehicles => &[
                "bicycle", "unicycle", "hot air balloon", "submarine", "helicopter", "skateboard",
                "tractor", "canoe", "rocket ship", "fire truck", "scooter", "sailboat",
                "tricycle", "monster truck", "gondola", "snowmobile", "hovercraft", "motorcycle",
                "school bus", "bulldozer",
            ],
            Self::Characters => &[
                "pirate", "wizard", "astronaut", "ninja", "vampire", "cowboy", "mermaid", "robot",
                "zombie", "superhero", "clown", "knight", "princess", "detective", "mummy",
                "werewolf", "ballerina", "lumberjack", "magician", "scarecrow", "chef",
            ],
            Self::Places => &[
                "volcano", "lighthouse", "haunted house", "igloo", "castle", "treehouse",
                "desert island", "bowling alley", "library", "circus tent", "waterfall",
                "pyramid", "jungle", "space station", "rollercoaster", "carnival", "museum",
                "glacier", "skyscraper",
            ],
            Self::Generic => &[],
        }
    }

    /// Extra classification hints that are never offered as candidates
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Animals => &[
                "dog", "cat", "bird", "fish", "horse", "cow", "pig", "bear", "lion", "monkey",
                "snake", "frog", "duck", "rabbit", "mouse", "sheep", "goat", "chicken", "puppy",
                "kitten", "parrot", "shark", "whale", "spider", "bee",
            ],
            Self::Foods => &[
                "cake", "bread", "cookie", "sandwich", "soup", "cheese", "apple", "egg", "pie",
                "noodle", "candy", "chocolate", "fruit", "salad", "burger", "pumpkin", "dough",
            ],
            Self::Kitchenware => &[
                "pan", "pot", "knife", "fork", "spoon", "plate", "cup", "bowl", "mitt", "stove",
                "microwave", "fridge", "refrigerator", "grater", "baking sheet",
            ],
            Self::Household => &[
                "chair", "table", "bed", "sofa", "couch", "blanket", "towel", "soap", "clock",
                "door", "window", "rug", "carpet", "shelf", "mop", "bucket", "vase", "candle",
                "suitcase", "diaper",
            ],
            Self::Instruments => &["guitar", "drum", "horn", "bell", "whistle", "keyboard", "microphone"],
            Self::Vehicles => &[
                "car", "bus", "truck", "train", "plane", "airplane", "boat", "ship", "bike",
                "taxi", "van", "jet", "kayak", "wagon", "rocket", "tire",
            ],
            Self::Characters => &[
                "king", "queen", "doctor", "teacher", "firefighter", "police officer", "soldier",
                "farmer", "fairy", "ghost", "witch", "alien", "monster",
            ],
            Self::Places => &[
                "beach", "mountain", "forest", "island", "city", "school", "hospital", "park",
                "cave", "house", "zoo", "farm", "desert", "river", "lake", "ocean", "stadium",
            ],
            Self::Generic => &[],
        }
    }

    /// Token prefixes (or multi-word fragments) that tie an activity to a category
    fn activity_hints(&self) -> &'static [&'static str] {
        match self {
            Self::Kitchenware => &[
                "cook", "bak", "chef", "grill", "kitchen", "recipe", "dinner", "breakfast", "fry",
                "roast", "knead",
            ],
            Self::Animals => &["zoo", "safari", "farm", "pet", "horse", "bird", "fish", "milk", "taming"],
            Self::Foods => &["picnic", "eat", "snack", "feast", "buffet", "tasting", "lunch", "dessert"],
            Self::Household => &[
                "clean", "laundry", "chore", "vacuum", "decorat", "moving", "furniture", "dust",
                "iron", "wash", "diaper",
            ],
            Self::Instruments => &[
                "concert", "band", "music", "sing", "orchestra", "conduct", "drum", "serenad",
                "karaoke",
            ],
            Self::Vehicles => &[
                "driv", "travel", "racing", "riding", "road trip", "commut", "parking", "sail",
                "row", "fly", "pilot",
            ],
            Self::Characters => &[
                "costume", "halloween", "movie", "theat", "audition", "magic", "superhero",
                "wedding", "talk show", "act",
            ],
            Self::Places => &[
                "vacation", "explor", "tour", "adventure", "camp", "hik", "climb", "sightsee",
                "tent", "surf", "ski",
            ],
            Self::Generic => &[],
        }
    }
}

// ============================================================================
// Classification
// ============================================================================

fn token_matches(token: &str, entry: &str) -> bool {
    token == entry
        || token
            .strip_prefix(entry)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

fn contains_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty()
        && haystack.len() >= needle.len()
        && haystack
            .windows(needle.len())
            .any(|w| w.iter().zip(needle).all(|(t, e)| token_matches(t, e)))
}

/// Classify a term by its own words. The longest matching vocabulary entry
/// wins, so "hot dog" is food even though "dog" is an animal hint.
pub fn classify(term: &str) -> Option<Category> {
    let normalized = NormalizedWord::new(term)?;
    let term_tokens = tokens(normalized.as_str());

    let mut best: Option<((usize, usize), Category)> = None;
    for &category in Category::vocabulary() {
        for entry in category.words().iter().chain(category.keywords()) {
            let entry_tokens = tokens(entry);
            if !contains_run(&term_tokens, &entry_tokens) {
                continue;
            }
            let score = (entry_tokens.len(), entry.len());
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, category));
            }
        }
    }
    best.map(|(_, category)| category)
}

/// Guess the category an activity revolves around.
pub fn infer_from_activity(activity: &str) -> Option<Category> {
    let normalized = NormalizedWord::new(activity)?;
    let activity_tokens = tokens(normalized.as_str());

    let mut best: Option<(usize, Category)> = None;
    for &category in Category::vocabulary() {
        for hint in category.activity_hints() {
            let hit = if hint.contains(' ') {
                normalized.as_str().contains(hint)
            } else {
                activity_tokens.iter().any(|t| t.starts_with(hint))
            };
            if hit && best.map_or(true, |(len, _)| hint.len() > len) {
                best = Some((hint.len(), category));
            }
        }
    }

    best.map(|(_, c)| c).or_else(|| classify(activity))
}

// ============================================================================
// Generic terms
// ============================================================================

/// Overly abstract words that cannot be mimed
pub const GENERIC_TERMS: &[&str] = &[
    "equipment", "item", "tool", "thing", "object", "stuff", "gear", "supplies", "device",
    "accessory", "material", "utensil", "implement", "apparatus", "container", "ingredient",
    "prop", "product", "gadget", "appliance",
];

pub fn is_generic_term(term: &str) -> bool {
    let Some(normalized) = NormalizedWord::new(term) else {
        return true;
    };
    tokens(normalized.as_str())
        .iter()
        .any(|t| GENERIC_TERMS.iter().any(|g| token_matches(t, g)))
}

// ============================================================================
// Fallback vocabularies
// ============================================================================

/// Activities used when the generator cannot supply a fresh one
pub const FALLBACK_ACTIVITIES: &[&str] = &[
    "baking a birthday cake", "washing a car", "building a sandcastle", "painting a portrait",
    "planting a garden", "fixing a flat tire", "brushing a horse", "decorating a christmas tree",
    "packing a suitcase", "flying a kite", "changing a diaper", "assembling furniture",
    "setting up a tent", "giving a haircut", "directing traffic", "conducting an orchestra",
    "performing a magic trick", "milking a cow", "ice skating", "walking a tightrope",
    "carving a pumpkin", "rowing a boat", "juggling", "surfing a big wave", "taming a lion",
    "kneading pizza dough", "doing laundry", "wrapping a present", "training for a marathon",
    "hosting a talk show", "bathing a puppy", "climbing a mountain", "serenading a crowd",
    "riding a rollercoaster", "catching a fish",
];

/// First half of synthesized compounds
pub const SEED_ADJECTIVES: &[&str] = &[
    "sparkly", "wobbly", "grumpy", "enormous", "invisible", "fluffy", "rusty", "glittering",
    "haunted", "tiny", "musical", "sleepy", "sticky", "frozen", "inflatable", "electric",
    "bouncy", "ancient", "polka-dot", "squeaky", "upside-down", "ticklish", "moody", "gigantic",
];

/// Second half of synthesized compounds. None of these classify into a
/// category, so a synthesized replacement is never congruous.
pub const SEED_NOUNS: &[&str] = &[
    "pogo stick", "yo-yo", "kazoo", "bubble wand", "snow globe", "jack-in-the-box",
    "boomerang", "sombrero", "pinwheel", "whoopee cushion", "disco ball", "hula hoop", "tiara",
    "monocle", "snorkel", "wind chime", "top hat", "feather duster", "piggy bank",
    "kaleidoscope", "trampoline", "slinky", "periscope", "tuxedo",
];
