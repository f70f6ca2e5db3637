use std::sync::Mutex;

use async_trait::async_trait;
use bookwright::llm::{GenerationError, Generator};
use bookwright::models::{ChapterNumber, Prompt, DEFAULT_TARGET_WORDS};
use bookwright::pipeline::*;
use bookwright::store::{ManuscriptStore, STARTER_BIBLE};
use speculate2::speculate;

/// Generator that records prompts and answers with a canned reply.
struct ScriptedGenerator {
    reply: String,
    prompts: Mutex<Vec<Prompt>>,
}

impl ScriptedGenerator {
    fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn last_prompt(&self) -> Prompt {
        self.prompts
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no prompt recorded")
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate(&self, prompt: &Prompt) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        Ok(self.reply.clone())
    }
}

fn chapter(n: u32) -> ChapterNumber {
    ChapterNumber::new(n).expect("valid chapter")
}

speculate! {
    describe "generate_outline" {
        it "returns the model text unchanged" {
            let reply = "  # Orbit Heist\n\n- Act I\n  - The crew\n\n";
            let generator = ScriptedGenerator::replying(reply);

            let outline = tokio_test::block_on(
                generate_outline(&generator, "A heist in orbit", "Terse.")
            ).expect("outline failed");

            assert_eq!(outline, reply);
        }

        it "embeds synopsis and style guide in the user instruction" {
            let generator = ScriptedGenerator::replying("ok");
            tokio_test::block_on(
                generate_outline(&generator, "A heist in orbit", "No adverbs.")
            ).expect("outline failed");

            let prompt = generator.last_prompt();
            assert_eq!(prompt.system, OUTLINE_SYSTEM);
            assert!(prompt.user.starts_with("Synopsis: A heist in orbit\n\n"));
            assert!(prompt.user.contains("Style Guide (optional):\nNo adverbs.\n\n"));
            assert!(prompt.user.ends_with("Return a detailed outline in Markdown with sections and bullets."));
        }

        it "tolerates an empty style guide" {
            let prompt = outline_prompt("A heist in orbit", "");
            assert!(prompt.user.contains("Style Guide (optional):\n\n\nReturn"));
        }

        it "rejects an empty synopsis without calling the model" {
            let generator = ScriptedGenerator::replying("never");
            let result = tokio_test::block_on(generate_outline(&generator, "   ", ""));

            assert!(matches!(result, Err(PipelineError::EmptySynopsis)));
            assert_eq!(generator.calls(), 0);
        }
    }

    describe "expand_chapter" {
        it "prefixes the draft with a heading from the chapter number" {
            let generator = ScriptedGenerator::replying("# Chapter 99\n\nThe airlock hissed.");
            let draft = tokio_test::block_on(expand_chapter(&generator, &ChapterRequest {
                chapter: chapter(3),
                target_words: DEFAULT_TARGET_WORDS,
                outline: "outline",
                bible: "bible",
                style_guide: "",
            })).expect("expand failed");

            assert!(draft.starts_with("# Chapter 3\n\n"));
            assert_eq!(draft, "# Chapter 3\n\n# Chapter 99\n\nThe airlock hissed.");
        }

        it "stamps the heading even when the model returns nothing" {
            let generator = ScriptedGenerator::replying("");
            let draft = tokio_test::block_on(expand_chapter(&generator, &ChapterRequest {
                chapter: chapter(12),
                target_words: 500,
                outline: "",
                bible: "",
                style_guide: "",
            })).expect("expand failed");

            assert_eq!(draft, "# Chapter 12\n\n");
        }

        it "orders outline, bible and style guide sections" {
            let prompt = chapter_prompt(&ChapterRequest {
                chapter: chapter(2),
                target_words: 800,
                outline: "OUTLINE BODY",
                bible: "BIBLE BODY",
                style_guide: "STYLE BODY",
            });

            assert_eq!(prompt.system, CHAPTER_SYSTEM);
            assert_eq!(
                prompt.user,
                "Use the outline and story bible to write Chapter 2. Target length approx 800 words.\n\n\
                 === OUTLINE ===\nOUTLINE BODY\n\n=== BIBLE ===\nBIBLE BODY\n\n=== STYLE GUIDE ===\nSTYLE BODY"
            );
        }
    }

    describe "continuity_pass" {
        before {
            let dir = tempfile::tempdir().expect("tempdir");
            let store = ManuscriptStore::new(dir.path().join("manuscript"));
        }

        it "returns the continuity notes heading" {
            let notes = continuity_pass(&PlaceholderChecker, &store).expect("continuity failed");

            assert!(notes.starts_with(CONTINUITY_HEADING));
            assert!(notes.contains("## Continuity Notes"));
            assert!(notes.contains("- [TODO] Add name/place consistency checks.\n"));
            assert!(notes.contains("- [TODO] Flag time jumps or contradictions.\n"));
        }

        it "does not depend on manuscript contents" {
            let empty = continuity_pass(&PlaceholderChecker, &store).expect("continuity failed");
            store.init().expect("init failed");
            let populated = continuity_pass(&PlaceholderChecker, &store).expect("continuity failed");

            assert_eq!(empty, populated);
            assert_eq!(store.read(bookwright::models::DocumentKind::Bible).unwrap(), STARTER_BIBLE);
        }
    }
}
