//! Prompt Template Engine: pure, deterministic rendering of model
//! instructions from validated request fields and the vocab tables.

use crate::vocab;

use super::{GenerateRequest, ImproveRequest, SeoRequest, TranslateRequest};

/// A fully rendered model instruction. Built from exactly one request
/// snapshot and never mutated; one document maps to one gateway call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument {
    text: String,
}

impl PromptDocument {
    fn new(text: String) -> Self {
        Self { text }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for PromptDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Render the generation prompt. `variant` carries the 1-based index when
/// more than one variant is requested; single-variant prompts get no index
/// framing at all.
pub fn generate_prompt(req: &GenerateRequest, variant: Option<u8>) -> PromptDocument {
    let variant_instruction = variant
        .map(|i| format!(" (Variant {i})"))
        .unwrap_or_default();
    let divergence_bullet = if variant.is_some() {
        "\n- Make this variant unique and different from others"
    } else {
        ""
    };

    let text = format!(
        "You are an expert e-commerce copywriter. Generate a compelling product description{variant_instruction}.\n\
        \n\
        Product Name: {name}\n\
        Category: {category}\n\
        Key Features: {features}\n\
        Target Audience: {audience}\n\
        Tone: {tone}\n\
        Language: Write the description in {language}\n\
        Length: {length}\n\
        \n\
        Requirements:\n\
        - Create an engaging, persuasive description\n\
        - Highlight benefits, not just features\n\
        - Use the specified tone consistently\n\
        - Include a call to action\n\
        - Make it SEO-friendly with natural keyword usage{divergence_bullet}\n\
        \n\
        Generate only the product description, no additional commentary.",
        name = req.product_name,
        category = req.category,
        features = or_default(&req.features, "Not specified"),
        audience = or_default(&req.target_audience, "General audience"),
        tone = req.tone,
        language = vocab::language_name(&req.language),
        length = vocab::length_phrase(&req.length),
    );

    PromptDocument::new(text)
}

pub fn improve_prompt(req: &ImproveRequest) -> PromptDocument {
    let focus = if req.improvement_focus.is_empty() {
        "general improvement".to_string()
    } else {
        req.improvement_focus.join(", ")
    };

    let text = format!(
        "You are an expert e-commerce copywriter. Improve the following product description.\n\
        \n\
        Original Description:\n\
        {original}\n\
        \n\
        Improvement Focus: {focus}\n\
        Desired Tone: {tone}\n\
        Language: Write in {language}\n\
        \n\
        Requirements:\n\
        - Maintain the core product information\n\
        - Enhance readability and engagement\n\
        - Apply the specified improvements\n\
        - Keep the specified tone\n\
        - Make it more persuasive\n\
        \n\
        Provide the improved description only, no explanations.",
        original = req.original_description,
        focus = focus,
        tone = req.tone,
        language = vocab::language_name(&req.language),
    );

    PromptDocument::new(text)
}

pub fn seo_prompt(req: &SeoRequest) -> PromptDocument {
    let text = format!(
        "You are an SEO expert for e-commerce. Analyze the following product and provide SEO recommendations.\n\
        \n\
        Product Name: {name}\n\
        Category: {category}\n\
        Description: {description}\n\
        Target Language: {language}\n\
        \n\
        Provide:\n\
        1. **Primary Keywords** (5-7 high-value keywords)\n\
        2. **Long-tail Keywords** (5-7 specific phrases)\n\
        3. **Meta Title Suggestion** (max 60 characters)\n\
        4. **Meta Description Suggestion** (max 155 characters)\n\
        5. **SEO Tips** (3-4 specific recommendations for this product)\n\
        \n\
        Format your response clearly with headers.",
        name = req.product_name,
        category = req.category,
        description = or_default(&req.description, "Not provided"),
        language = vocab::language_name(&req.language),
    );

    PromptDocument::new(text)
}

pub fn translate_prompt(req: &TranslateRequest) -> PromptDocument {
    let adaptation_instruction = if req.adapt_culturally {
        "\n- Adapt cultural references, idioms, and expressions for the target market\n\
        - Adjust measurements, sizes, or formats if relevant\n\
        - Consider local preferences and buying habits"
    } else {
        ""
    };

    let text = format!(
        "You are a professional translator specialized in e-commerce content.\n\
        \n\
        Original Description ({source}):\n\
        {description}\n\
        \n\
        Task: Translate to {target}\n\
        \n\
        Requirements:\n\
        - Maintain the persuasive tone and marketing appeal\n\
        - Preserve all product information accurately\n\
        - Keep the same structure and formatting{adaptation_instruction}\n\
        \n\
        Provide only the translated description.",
        source = vocab::language_name(&req.source_language),
        description = req.description,
        target = vocab::language_name(&req.target_language),
    );

    PromptDocument::new(text)
}
