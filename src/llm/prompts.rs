//! Prompt templates for the two LLM steps. Placeholders are substituted
//! with plain string replacement; both prompts demand a JSON object back.

pub const SYSTEM_REPHRASE: &str = "You are a helpful assistant having expertise in analysing chat history and proving output in JSON format.";

pub const SYSTEM_GENERATE: &str = "You are a helpful assistant having expertise in answering the question in JSON format based on given context.";

pub const PROMPT_REPHRASE_QUERY: &str = r#"You are an AI agent that can answer user questions based on the knowledge you have from the weblinks.
But before generating the answer, you have to decide if the user query is related to previous chat or a general query for a chatbot like greetings and salutations, etc.
If the query is not relevant to the given chat history then give the same query in the output.
And rephrase the current query based on previous chat history if required, so that the current query can be used to SEARCH THE VECTOR DB for relevant chunks.
Given the previous chat history between a user and a chatbot for a RAG use case.

previous chat:
{previous_chat}

current query:
{current_query}

Give the output in following JSON format:
{
"response": ""
}"#;

pub const PROMPT_GENERATE_ANSWER: &str = r#"you are an AI agent that can answer user questions based on the knowledge you have from the weblinks.
If the user query is not related to the documents and is about some other topics then just say "I don't quite get that. I don't have this information."
But if the user query is very basic like greetings and salutations, then reply appropriately.

The user asked: {user_query}. Based on the retrieved documents below, please provide a relevant answer to their question which is not too long.
Also, give a flag in the output to indicate if the answer has been given based on the documents.
Documents:
{documents}

Give the output in following JSON format:
{
"response": "",
"is_query_relevant": "true/false"
}"#;

pub fn rephrase_prompt(previous_chat: &str, current_query: &str) -> String {
    PROMPT_REPHRASE_QUERY
        .replace("{previous_chat}", previous_chat)
        .replace("{current_query}", current_query)
}

pub fn generate_prompt(documents: &str, user_query: &str) -> String {
    PROMPT_GENERATE_ANSWER
        .replace("{documents}", documents)
        .replace("{user_query}", user_query)
}
