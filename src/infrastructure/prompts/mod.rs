mod fs_prompt_store;

pub use fs_prompt_store::FsPromptStore;
