//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Parley Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[model]
# name = "gemini-2.0-flash"
# base_url = "https://generativelanguage.googleapis.com/v1beta/openai/"
# api_key_env = "GEMINI_API_KEY"   # variable holding the API key
# temperature = 0.7                # 0.0-2.0, unset = provider default
# max_tokens = 4096                # 1-65536, unset = provider default
# connect_timeout_secs = 10        # 1-300
# request_timeout_secs = 120       # 1-3600

[agent]
# name = "Assistant"
# instructions = "You are a helpful assistant. Answer the user's questions to the best of your ability."
# greeting = "Welcome to Parley! How can I help you today?"
# remember_greeting = true         # keep the greeting in the conversation history

[chat]
# stream = false                   # print replies token by token
# log_turns = true
"##
    .to_string()
}
