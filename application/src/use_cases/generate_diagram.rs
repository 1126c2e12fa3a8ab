//! Generate Diagram use case.
//!
//! Turns one chat turn plus prior history into a conversational reply and a
//! Mermaid diagram:
//!
//! 1. Assemble `[policy, ...history, user message]`
//! 2. Call the model
//! 3. Extract the first ```` ```mermaid ```` block
//! 4. Validate it; on failure re-prompt with the validator's error, up to
//!    the repair ceiling
//! 5. Strip diagram blocks from the final reply and return both parts
//!
//! A clarifying reply without a diagram is a normal outcome. A diagram that is
//! still invalid after the last repair is returned as-is together with its
//! error; only a failed model call aborts the turn.

use crate::config::GenerationParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::diagram_validator::DiagramValidator;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::progress::{GenerationProgress, NoProgress};
use flowgrid_domain::util::preview;
use flowgrid_domain::{
    DiagramStatus, GenerationRequest, GenerationResult, Message, PromptTemplate, RepairLoop,
    RepairStep, Transcript, assemble_instructions, count_diagram_blocks, extract_diagram,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that abort a turn.
#[derive(Error, Debug)]
pub enum GenerateDiagramError {
    #[error("Failed to generate diagram: {0}")]
    Gateway(#[from] GatewayError),
}

/// Use case for generating one diagram turn.
pub struct GenerateDiagramUseCase {
    gateway: Arc<dyn LlmGateway>,
    validator: Arc<dyn DiagramValidator>,
    params: GenerationParams,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl Clone for GenerateDiagramUseCase {
    fn clone(&self) -> Self {
        Self {
            gateway: self.gateway.clone(),
            validator: self.validator.clone(),
            params: self.params.clone(),
            conversation_logger: self.conversation_logger.clone(),
        }
    }
}

impl GenerateDiagramUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        validator: Arc<dyn DiagramValidator>,
        params: GenerationParams,
    ) -> Self {
        Self {
            gateway,
            validator,
            params,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn params(&self) -> &GenerationParams {
        &self.params
    }

    /// Whether the model gateway has credentials to make calls.
    pub fn is_configured(&self) -> bool {
        self.gateway.is_configured()
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerateDiagramError> {
        self.execute_with_progress(request, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        request: &GenerationRequest,
        progress: &dyn GenerationProgress,
    ) -> Result<GenerationResult, GenerateDiagramError> {
        info!(
            "Generating reply ({} prior turns): {}",
            request.history().len(),
            preview(request.user_message(), 100)
        );

        let policy = self
            .params
            .system_prompt
            .as_deref()
            .unwrap_or(PromptTemplate::diagram_policy());
        let transcript = assemble_instructions(policy, request.history(), request.user_message());

        let mut attempts = 1;
        let mut reply = self.invoke(&transcript, attempts, progress).await?;
        let mut diagram = self.extract(&reply, attempts, progress);

        if diagram.is_empty() {
            debug!("No diagram block in reply; treating it as a clarifying turn");
            let result =
                GenerationResult::assemble(&reply, diagram, DiagramStatus::Absent, None, attempts);
            return Ok(self.finish(result, progress));
        }

        if !self.validator.is_enabled() {
            debug!("Validation disabled; returning diagram unchecked");
            let result = GenerationResult::assemble(
                &reply,
                diagram,
                DiagramStatus::Unvalidated,
                None,
                attempts,
            );
            return Ok(self.finish(result, progress));
        }

        let mut repair = RepairLoop::new(self.params.repair);
        let mut step = self.validate(&mut repair, &diagram, attempts, progress).await;

        loop {
            match step {
                RepairStep::Accept => {
                    if attempts > 1 {
                        info!("Mermaid syntax fixed after {} attempts", attempts);
                    }
                    let result = GenerationResult::assemble(
                        &reply,
                        diagram,
                        DiagramStatus::Valid,
                        None,
                        attempts,
                    );
                    return Ok(self.finish(result, progress));
                }
                RepairStep::GiveUp { error } => {
                    warn!(
                        "Failed to fix Mermaid syntax after {} repairs: {}",
                        repair.retries(),
                        error
                    );
                    let result = GenerationResult::assemble(
                        &reply,
                        diagram,
                        DiagramStatus::Exhausted,
                        Some(error),
                        attempts,
                    );
                    return Ok(self.finish(result, progress));
                }
                RepairStep::Retry { retry, error } => {
                    warn!(
                        "Mermaid syntax error detected (repair {}/{}): {}",
                        retry, self.params.repair.max_retries, error
                    );

                    let repair_transcript = transcript.extended([
                        Message::assistant(reply.clone()),
                        Message::user(PromptTemplate::repair_request(&error)),
                    ]);

                    attempts += 1;
                    reply = self.invoke(&repair_transcript, attempts, progress).await?;
                    diagram = self.extract(&reply, attempts, progress);

                    step = if diagram.is_empty() {
                        debug!("Repair reply {} carried no diagram block", retry);
                        repair.record_missing_diagram()
                    } else {
                        self.validate(&mut repair, &diagram, attempts, progress)
                            .await
                    };
                }
            }
        }
    }

    async fn invoke(
        &self,
        transcript: &Transcript,
        attempt: u32,
        progress: &dyn GenerationProgress,
    ) -> Result<String, GenerateDiagramError> {
        progress.on_attempt_start(attempt, self.params.repair.max_attempts());

        let options = self.params.completion_options();
        debug!(
            "Attempt {}: sending {} messages to {}",
            attempt,
            transcript.len(),
            options.model
        );
        self.conversation_logger.log(ConversationEvent::new(
            "model_request",
            serde_json::json!({
                "attempt": attempt,
                "model": options.model.to_string(),
                "messages": transcript.messages(),
            }),
        ));

        let reply = self
            .gateway
            .complete(transcript.messages(), &options)
            .await
            .inspect_err(|e| warn!("Model call failed on attempt {}: {}", attempt, e))?;

        self.conversation_logger.log(ConversationEvent::new(
            "model_response",
            serde_json::json!({
                "attempt": attempt,
                "bytes": reply.len(),
                "text": reply,
            }),
        ));

        Ok(reply)
    }

    fn extract(&self, reply: &str, attempt: u32, progress: &dyn GenerationProgress) -> String {
        let blocks = count_diagram_blocks(reply);
        if blocks > 1 {
            debug!(
                "Reply carries {} diagram blocks; only the first is used",
                blocks
            );
        }
        let diagram = extract_diagram(reply);
        progress.on_model_reply(attempt, !diagram.is_empty());
        diagram
    }

    async fn validate(
        &self,
        repair: &mut RepairLoop,
        diagram: &str,
        attempt: u32,
        progress: &dyn GenerationProgress,
    ) -> RepairStep {
        repair.begin_validation();
        let outcome = self.validator.validate(diagram).await;
        progress.on_validation(attempt, &outcome);

        self.conversation_logger.log(ConversationEvent::new(
            "diagram_validation",
            serde_json::json!({
                "attempt": attempt,
                "valid": outcome.valid,
                "error": outcome.error_detail,
            }),
        ));

        repair.record_outcome(outcome)
    }

    fn finish(&self, result: GenerationResult, progress: &dyn GenerationProgress) -> GenerationResult {
        info!(
            "Generation finished: status={:?}, attempts={}",
            result.status, result.attempts
        );
        self.conversation_logger.log(ConversationEvent::new(
            "generation_result",
            serde_json::json!({
                "status": result.status,
                "attempts": result.attempts,
                "diagram": result.diagram_text,
                "syntax_error": result.syntax_error,
            }),
        ));
        progress.on_complete(&result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::diagram_validator::DisabledValidator;
    use crate::ports::llm_gateway::CompletionOptions;
    use async_trait::async_trait;
    use flowgrid_domain::{FALLBACK_REPLY, Role, ValidationOutcome};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct MockGateway {
        replies: Mutex<VecDeque<Result<String, GatewayError>>>,
        calls: Mutex<Vec<Vec<Message>>>,
        configured: bool,
    }

    impl MockGateway {
        fn new(replies: Vec<&str>) -> Self {
            Self::with_results(replies.into_iter().map(|r| Ok(r.to_string())).collect())
        }

        fn with_results(replies: Vec<Result<String, GatewayError>>) -> Self {
            Self {
                replies: Mutex::new(VecDeque::from(replies)),
                calls: Mutex::new(Vec::new()),
                configured: true,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        fn call(&self, index: usize) -> Vec<Message> {
            self.calls.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl LlmGateway for MockGateway {
        async fn complete(
            &self,
            messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<String, GatewayError> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GatewayError::Other("No more replies".to_string())))
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    struct MockValidator {
        outcomes: Mutex<VecDeque<ValidationOutcome>>,
        checked: Mutex<Vec<String>>,
    }

    impl MockValidator {
        fn new(outcomes: Vec<ValidationOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(VecDeque::from(outcomes)),
                checked: Mutex::new(Vec::new()),
            }
        }

        fn checked(&self) -> Vec<String> {
            self.checked.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DiagramValidator for MockValidator {
        async fn validate(&self, diagram: &str) -> ValidationOutcome {
            self.checked.lock().unwrap().push(diagram.to_string());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(ValidationOutcome::valid)
        }
    }

    fn use_case(gateway: &Arc<MockGateway>, validator: &Arc<MockValidator>) -> GenerateDiagramUseCase {
        GenerateDiagramUseCase::new(
            gateway.clone(),
            validator.clone(),
            GenerationParams::default(),
        )
    }

    fn request(message: &str) -> GenerationRequest {
        GenerationRequest::new(message, vec![]).unwrap()
    }

    fn diagram_reply(text: &str, code: &str) -> String {
        format!("{}\n```mermaid\n{}\n```", text, code)
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_clarifying_reply_without_diagram() {
        let questions = "Happy to help! Which steps should the login include?\n\n1. Password reset?\n2. MFA?";
        let gateway = Arc::new(MockGateway::new(vec![questions]));
        let validator = Arc::new(MockValidator::new(vec![]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Create a login flowchart"))
            .await
            .unwrap();

        assert_eq!(result.diagram_text, "");
        assert_eq!(result.reply_text, questions);
        assert_eq!(result.status, DiagramStatus::Absent);
        assert_eq!(gateway.call_count(), 1);
        assert!(validator.checked().is_empty());
    }

    #[tokio::test]
    async fn test_valid_first_reply_single_call() {
        let gateway = Arc::new(MockGateway::new(vec!["Here:\n```mermaid\nA->B\n```"]));
        let validator = Arc::new(MockValidator::new(vec![ValidationOutcome::valid()]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Draw A to B"))
            .await
            .unwrap();

        assert_eq!(result.diagram_text, "A->B");
        assert_eq!(result.reply_text, "Here:");
        assert_eq!(result.status, DiagramStatus::Valid);
        assert_eq!(result.attempts, 1);
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(validator.checked(), vec!["A->B".to_string()]);
    }

    #[tokio::test]
    async fn test_first_call_transcript_shape() {
        let history = vec![
            Message::user("Create a login flowchart"),
            Message::assistant("Which steps?"),
        ];
        let gateway = Arc::new(MockGateway::new(vec!["Noted."]));
        let validator = Arc::new(MockValidator::new(vec![]));
        let request = GenerationRequest::new("Email, password, MFA", history.clone()).unwrap();

        use_case(&gateway, &validator)
            .execute(&request)
            .await
            .unwrap();

        let sent = gateway.call(0);
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[0], Message::system(PromptTemplate::diagram_policy()));
        assert_eq!(&sent[1..3], history.as_slice());
        assert_eq!(sent[3], Message::user("Email, password, MFA"));
        assert_eq!(request.history(), history.as_slice());
    }

    #[tokio::test]
    async fn test_repaired_on_third_attempt() {
        let replies = [
            diagram_reply("First", "graph TD\nA-->"),
            diagram_reply("Second", "graph TD\nA-->>B"),
            diagram_reply("Third", "graph TD\nA-->B"),
        ];
        let gateway = Arc::new(MockGateway::new(replies.iter().map(String::as_str).collect()));
        let validator = Arc::new(MockValidator::new(vec![
            ValidationOutcome::invalid("error one"),
            ValidationOutcome::invalid("error two"),
            ValidationOutcome::valid(),
        ]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 3);
        assert_eq!(result.diagram_text, "graph TD\nA-->B");
        assert_eq!(result.reply_text, "Third");
        assert_eq!(result.status, DiagramStatus::Valid);
        assert_eq!(result.attempts, 3);
        assert!(result.syntax_error.is_none());
    }

    #[tokio::test]
    async fn test_exhausted_returns_last_attempt() {
        let replies = [
            diagram_reply("One", "bad 1"),
            diagram_reply("Two", "bad 2"),
            diagram_reply("Three", "bad 3"),
        ];
        let gateway = Arc::new(MockGateway::new(replies.iter().map(String::as_str).collect()));
        let validator = Arc::new(MockValidator::new(vec![
            ValidationOutcome::invalid("e1"),
            ValidationOutcome::invalid("e2"),
            ValidationOutcome::invalid("e3"),
        ]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 3);
        assert_eq!(result.diagram_text, "bad 3");
        assert_eq!(result.reply_text, "Three");
        assert_eq!(result.status, DiagramStatus::Exhausted);
        assert_eq!(result.syntax_error.as_deref(), Some("e3"));
        assert_eq!(validator.checked(), vec!["bad 1", "bad 2", "bad 3"]);
    }

    #[tokio::test]
    async fn test_repair_prompt_carries_exact_error_and_prior_reply() {
        let first = diagram_reply("Attempt", "graph TD\nA-->");
        let gateway = Arc::new(MockGateway::new(vec![
            first.as_str(),
            "Fixed\n```mermaid\ngraph TD\nA-->B\n```",
        ]));
        let validator = Arc::new(MockValidator::new(vec![
            ValidationOutcome::invalid("unexpected token at line 2"),
            ValidationOutcome::valid(),
        ]));

        use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap();

        let initial = gateway.call(0);
        let repair = gateway.call(1);
        assert_eq!(repair.len(), initial.len() + 2);
        assert_eq!(&repair[..initial.len()], initial.as_slice());
        assert_eq!(repair[initial.len()], Message::assistant(first.clone()));

        let instruction = &repair[initial.len() + 1];
        assert_eq!(instruction.role, Role::User);
        assert!(instruction.content.contains("unexpected token at line 2"));
    }

    #[tokio::test]
    async fn test_each_repair_builds_on_original_transcript() {
        let gateway = Arc::new(MockGateway::new(vec![
            "```mermaid\nx1\n```",
            "```mermaid\nx2\n```",
            "```mermaid\nx3\n```",
        ]));
        let validator = Arc::new(MockValidator::new(vec![
            ValidationOutcome::invalid("e1"),
            ValidationOutcome::invalid("e2"),
            ValidationOutcome::valid(),
        ]));

        use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap();

        let third = gateway.call(2);
        assert_eq!(third.len(), 4);
        assert_eq!(third[2], Message::assistant("```mermaid\nx2\n```"));
        assert!(third[3].content.contains("\"e2\""));
    }

    #[tokio::test]
    async fn test_retry_without_diagram_still_counts() {
        let gateway = Arc::new(MockGateway::new(vec![
            "```mermaid\nbad\n```",
            "Sorry, could you clarify the arrows?",
            "Let me try again.",
        ]));
        let validator = Arc::new(MockValidator::new(vec![ValidationOutcome::invalid(
            "Parse error",
        )]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap();

        assert_eq!(gateway.call_count(), 3);
        assert_eq!(validator.checked().len(), 1);
        assert_eq!(result.status, DiagramStatus::Exhausted);
        assert_eq!(result.diagram_text, "");
        assert_eq!(result.reply_text, "Let me try again.");
        assert_eq!(result.syntax_error.as_deref(), Some("Parse error"));
        // The last known error is what the third call was asked to fix
        assert!(gateway.call(2).last().unwrap().content.contains("Parse error"));
    }

    #[tokio::test]
    async fn test_huge_repair_ceiling_still_runs() {
        let gateway = Arc::new(MockGateway::new(vec!["```mermaid\ngraph TD\n  A-->B\n```"]));
        let validator = Arc::new(MockValidator::new(vec![ValidationOutcome::valid()]));
        let use_case = GenerateDiagramUseCase::new(
            gateway.clone(),
            validator.clone(),
            GenerationParams::default().with_max_repair_retries(u32::MAX),
        );

        let result = use_case.execute(&request("Draw it")).await.unwrap();

        assert_eq!(gateway.call_count(), 1);
        assert_eq!(result.status, DiagramStatus::Valid);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_hard_error() {
        let gateway = Arc::new(MockGateway::with_results(vec![Err(GatewayError::Upstream {
            status: 429,
            status_text: "Too Many Requests".to_string(),
        })]));
        let validator = Arc::new(MockValidator::new(vec![]));

        let err = use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Too Many Requests"));
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_during_repair_aborts() {
        let gateway = Arc::new(MockGateway::with_results(vec![
            Ok("```mermaid\nbad\n```".to_string()),
            Err(GatewayError::ConnectionError("connection reset".to_string())),
        ]));
        let validator = Arc::new(MockValidator::new(vec![ValidationOutcome::invalid("e")]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await;

        assert!(matches!(
            result,
            Err(GenerateDiagramError::Gateway(GatewayError::ConnectionError(_)))
        ));
        assert_eq!(gateway.call_count(), 2);
    }

    #[tokio::test]
    async fn test_zero_retry_ceiling_makes_one_call() {
        let gateway = Arc::new(MockGateway::new(vec!["```mermaid\nbad\n```"]));
        let validator = Arc::new(MockValidator::new(vec![ValidationOutcome::invalid("e")]));
        let use_case = GenerateDiagramUseCase::new(
            gateway.clone(),
            validator.clone(),
            GenerationParams::default().with_max_repair_retries(0),
        );

        let result = use_case.execute(&request("Draw it")).await.unwrap();

        assert_eq!(gateway.call_count(), 1);
        assert_eq!(result.status, DiagramStatus::Exhausted);
        assert_eq!(result.reply_text, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_disabled_validator_skips_repair() {
        let gateway = Arc::new(MockGateway::new(vec!["Done\n```mermaid\nanything\n```"]));
        let use_case = GenerateDiagramUseCase::new(
            gateway.clone(),
            Arc::new(DisabledValidator),
            GenerationParams::default(),
        );

        let result = use_case.execute(&request("Draw it")).await.unwrap();

        assert_eq!(result.status, DiagramStatus::Unvalidated);
        assert_eq!(result.diagram_text, "anything");
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_custom_system_prompt_leads_transcript() {
        let gateway = Arc::new(MockGateway::new(vec!["ok"]));
        let validator = Arc::new(MockValidator::new(vec![]));
        let use_case = GenerateDiagramUseCase::new(
            gateway.clone(),
            validator,
            GenerationParams::default().with_system_prompt("Only sequence diagrams."),
        );

        use_case.execute(&request("hi")).await.unwrap();

        assert_eq!(gateway.call(0)[0], Message::system("Only sequence diagrams."));
    }

    #[tokio::test]
    async fn test_only_first_block_validated_but_all_stripped() {
        let gateway = Arc::new(MockGateway::new(vec![
            "Two options:\n```mermaid\nA-->B\n```\nor\n```mermaid\nB-->A\n```",
        ]));
        let validator = Arc::new(MockValidator::new(vec![ValidationOutcome::valid()]));

        let result = use_case(&gateway, &validator)
            .execute(&request("Draw it"))
            .await
            .unwrap();

        assert_eq!(validator.checked(), vec!["A-->B".to_string()]);
        assert_eq!(result.reply_text, "Two options:\n\nor");
    }
}
