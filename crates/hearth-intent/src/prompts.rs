//! Fixed instruction templates for the reasoning provider.
//!
//! Templates are data, not logic: each one pins the output contract the
//! caller validates against (a closed word set, `true`/`false`, bare JSON).

/// Classify an utterance into the closed intent set.
pub const CLASSIFY: &str = "Analyze the following user text. \
    Return exactly one of these words in lowercase: \
    'control', 'question', 'weather', 'rebuild_database', 'test'. \
    No other text.";

/// Reduce an utterance to retrieval keywords.
pub const REFINE_QUERY: &str = "Extract the essential keywords from the user's request \
    to find relevant devices with keyword search. \
    The most important keyword to search for is room name \
    (office, living room, dining room, bedroom, kitchen). \
    Do not include adjectives, focus on nouns. \
    Focus on device type (light, fan, media_player, climate, switch). \
    If the user is being vague describing a scene then provide keywords \
    which could achieve the intent of the user. \
    Return only a short phrase in lowercase.";

/// Decide whether the utterance implies music playback.
pub const WANTS_MUSIC: &str = "Decide if the user's command implies or would benefit \
    from playing music. Return 'true' or 'false' only, no extra text.";

/// Turn an utterance into a music search query with field filters.
pub const MUSIC_QUERY: &str = "Based on the user's prompt, generate a concise music \
    search query using field filters. Use only 'track:', 'album:', or 'playlist:' \
    as needed. Return only the query, no other text. Never return an artist; \
    if the user wants music from a specific artist find a playlist or album, \
    unless the user requests a specific song from that artist, in which case \
    the artist should be a filter and not the primary search term.";

/// Summarize pending commands and ask for confirmation.
pub const CONFIRMATION: &str = "The assistant prepared smart-home commands for the \
    user's request. Summarize what is about to happen in one short friendly \
    sentence and ask the user to confirm with yes or no. \
    Return only that sentence.";

/// Build the command-generation instruction around the device context.
pub fn command_generation(context: &str) -> String {
    format!(
        "You are a smart-home command generator. \
        The user wants to perform some action. We also have the following device info:\n\
        {context}\n\
        Output a JSON array of commands. Always return an array even if there is only 1 item. \
        Each command is an object, see the example of desired output below:\n\
        [\n\
        \x20   {{\n\
        \x20       \"service\": \"light.turn_on\",\n\
        \x20       \"data\": {{\n\
        \x20           \"entity_id\": \"light.office_spotlight_left\",\n\
        \x20           \"hs_color\": [39, 100]\n\
        \x20       }}\n\
        \x20   }},\n\
        \x20   {{\n\
        \x20       \"service\": \"media_player.play_media\",\n\
        \x20       \"data\": {{\n\
        \x20           \"entity_id\": \"media_player.kitchen_speaker\",\n\
        \x20           \"media_content_id\": \"spotify:playlist:6Jk1rXWdpLQaMiWaM9Tjor\",\n\
        \x20           \"media_content_type\": \"music\",\n\
        \x20           \"enqueue\": \"replace\"\n\
        \x20       }}\n\
        \x20   }}\n\
        ]\n\
        If the user wants multiple devices changed, output multiple items in the array. \
        If any color/brightness/temperature is implied by the user, set them. \
        Use numeric arrays for color. If the domain is climate, use 'temperature'. \
        If the user requests music only use the provided music URI, do not make one up. \
        IMPORTANT: Return ONLY valid JSON, no extra text or code fences."
    )
}
