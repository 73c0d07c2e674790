// Pathway generation: profile → prompt → one provider → validated PathwayResponse.
// All provider calls go through llm_client; nothing here speaks HTTP to a vendor.

pub mod connectivity;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod validation;
