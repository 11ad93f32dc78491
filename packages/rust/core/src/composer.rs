//! Report composition: search context → prompt → generated report.

use salesinsights_search::{MultiQuerySearchAggregator, SearchService, SearchWarning};
use salesinsights_shared::{ReportRequest, SalesInsightsError, SearchResult};
use tracing::{info, instrument, warn};

use crate::llm::{ChatMessage, TextGenerator};

/// Maximum number of search results serialized into the prompt.
pub const MAX_CONTEXT_RESULTS: usize = 10;

/// Message returned instead of a report when search found nothing.
pub const NO_RESULTS_MESSAGE: &str =
    "❌ **No search results found. Please check the company name and try again.**";

/// Role and behaviour of the analyst.
pub const SYSTEM_PROMPT: &str = "You are an expert B2B sales intelligence analyst with deep expertise in:
- Competitive intelligence and market analysis
- Strategic business assessment
- Decision-maker identification and influence mapping
- Sales opportunity assessment and timing

Provide actionable insights that directly support sales strategy and engagement planning.
Focus on concrete, specific information that can inform sales conversations and approach.";

/// Six-section report layout plus format, tone and length directives.
const REPORT_TEMPLATE: &str = "Please structure your response as follows:

## Executive Summary
Provide a 2-3 sentence strategic overview of this sales opportunity.

## Company Strategic Profile
- Current business strategy and priorities
- Recent strategic initiatives, funding, or major changes
- Growth areas and expansion plans
- Technology stack and digital transformation initiatives

## Competitive Landscape Analysis
- Current vendors and technology partners
- Competitive threats and market positioning
- Partnership opportunities
- Switching costs and vendor lock-in considerations

## Key Stakeholders & Decision Makers
- Primary decision makers and their backgrounds
- Influence network and reporting structure
- Past experience with similar solutions
- Preferred communication styles and channels

## Sales Opportunity Assessment
- Market timing and urgency indicators
- Budget and procurement cycle insights
- Potential pain points and value propositions
- Recommended engagement strategy and talking points
- Risk factors and potential objections

## Next Steps & Action Items
- Immediate research follow-ups needed
- Recommended outreach sequence
- Key questions to ask in initial conversations
- Resources and case studies to prepare

**FORMAT:** Use clear markdown formatting with proper headings, bullet points, and emphasis for key insights.
**TONE:** Professional, analytical, and action-oriented.
**LENGTH:** Comprehensive but scannable - aim for 350-500 words.";

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Serialize at most [`MAX_CONTEXT_RESULTS`] results as `Result {i}: {raw}`
/// blocks, numbered from 1.
pub fn search_context(results: &[SearchResult]) -> String {
    let mut context = String::new();
    for (i, result) in results.iter().take(MAX_CONTEXT_RESULTS).enumerate() {
        context.push_str(&format!("Result {}: {}\n\n", i + 1, result.raw()));
    }
    context
}

/// Build the system + user message pair for one report.
pub fn build_messages(request: &ReportRequest, context: &str) -> [ChatMessage; 2] {
    let user = format!(
        "Based on the following search results, provide a comprehensive sales intelligence report.

Search Results:
{context}
Company: {company}
Product: {product}
Competitors: {competitors}
Company URL: {url}

{REPORT_TEMPLATE}
",
        company = request.company_name,
        product = request.product_name,
        competitors = request.competitors,
        url = request.company_url,
    );

    [ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}

// ---------------------------------------------------------------------------
// ReportComposer
// ---------------------------------------------------------------------------

/// What a composition produced.
#[derive(Debug)]
pub enum Composed {
    /// Model output, verbatim.
    Report(String),
    /// Search returned nothing; the model was not called.
    NoResults,
    /// Generation failed.
    Failed(SalesInsightsError),
}

impl Composed {
    /// Text to display for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Report(content) => content.clone(),
            Self::NoResults => NO_RESULTS_MESSAGE.to_string(),
            Self::Failed(e) => e.user_message(),
        }
    }
}

/// Composition outcome plus the search data it was based on.
#[derive(Debug)]
pub struct Composition {
    pub composed: Composed,
    /// All aggregated results, not only the ones placed in the prompt.
    pub results: Vec<SearchResult>,
    pub warnings: Vec<SearchWarning>,
}

/// Drives aggregation and a single generation call per report.
pub struct ReportComposer<S, G> {
    aggregator: MultiQuerySearchAggregator<S>,
    generator: G,
}

impl<S: SearchService, G: TextGenerator> ReportComposer<S, G> {
    pub fn new(aggregator: MultiQuerySearchAggregator<S>, generator: G) -> Self {
        Self {
            aggregator,
            generator,
        }
    }

    #[instrument(skip_all, fields(company = %request.company_name))]
    pub async fn compose(&self, request: &ReportRequest) -> Composition {
        let aggregated = self
            .aggregator
            .search(
                &request.company_name,
                &request.company_url,
                &request.product_name,
            )
            .await;

        if aggregated.is_empty() {
            info!("no search results, skipping generation");
            return Composition {
                composed: Composed::NoResults,
                results: aggregated.results,
                warnings: aggregated.warnings,
            };
        }

        let context = search_context(&aggregated.results);
        let messages = build_messages(request, &context);

        let composed = match self.generator.generate(&messages).await {
            Ok(content) => Composed::Report(content),
            Err(e) => {
                warn!(error = %e, "report generation failed");
                Composed::Failed(e)
            }
        };

        Composition {
            composed,
            results: aggregated.results,
            warnings: aggregated.warnings,
        }
    }
}
