//! Fixed catalogs offered by the registration form

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DomainError;

/// Desired researcher seniority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResearcherLevel {
    Professor,
    AssociateProfessor,
    AssistantProfessor,
    Lecturer,
    FormerAssistantProfessor,
    ResearchAssistant,
    Researcher,
    ProjectAssistantProfessor,
    SeniorResearcher,
    ProjectProfessor,
}

impl ResearcherLevel {
    /// Every level, in the order the form lists them
    pub const ALL: [ResearcherLevel; 10] = [
        ResearcherLevel::Professor,
        ResearcherLevel::AssociateProfessor,
        ResearcherLevel::AssistantProfessor,
        ResearcherLevel::Lecturer,
        ResearcherLevel::FormerAssistantProfessor,
        ResearcherLevel::ResearchAssistant,
        ResearcherLevel::Researcher,
        ResearcherLevel::ProjectAssistantProfessor,
        ResearcherLevel::SeniorResearcher,
        ResearcherLevel::ProjectProfessor,
    ];

    /// Label exchanged with the backend and shown in the form
    pub fn label(&self) -> &'static str {
        match self {
            ResearcherLevel::Professor => "教授",
            ResearcherLevel::AssociateProfessor => "准教授",
            ResearcherLevel::AssistantProfessor => "助教",
            ResearcherLevel::Lecturer => "講師",
            ResearcherLevel::FormerAssistantProfessor => "助教授",
            ResearcherLevel::ResearchAssistant => "助手",
            ResearcherLevel::Researcher => "研究員",
            ResearcherLevel::ProjectAssistantProfessor => "特任助教",
            ResearcherLevel::SeniorResearcher => "主任研究員",
            ResearcherLevel::ProjectProfessor => "特任教授",
        }
    }
}

impl fmt::Display for ResearcherLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ResearcherLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResearcherLevel::ALL
            .into_iter()
            .find(|level| level.label() == s)
            .ok_or_else(|| DomainError::UnknownResearcherLevel(s.to_string()))
    }
}

impl Serialize for ResearcherLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ResearcherLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// TSE 33-sector industry classification used by the industry select box
pub const INDUSTRY_CATEGORIES: [&str; 33] = [
    "水産・農林業",
    "鉱業",
    "建設業",
    "食料品",
    "繊維製品",
    "パルプ・紙",
    "化学",
    "医薬品",
    "石油・石炭製品",
    "ゴム製品",
    "ガラス・土石製品",
    "鉄鋼",
    "非鉄金属",
    "金属製品",
    "機械",
    "電気機器",
    "輸送用機器",
    "精密機器",
    "その他製品",
    "電気・ガス業",
    "陸運業",
    "海運業",
    "空運業",
    "倉庫・運輸関連業",
    "情報・通信業",
    "卸売業",
    "小売業",
    "銀行業",
    "証券、商品先物取引業",
    "保険業",
    "その他金融業",
    "不動産業",
    "サービス業",
];

/// An industry category; the form allows leaving it unselected
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndustryCategory(String);

impl IndustryCategory {
    /// Parse a submitted value; empty means "not selected"
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let value = value.trim();
        if value.is_empty() || INDUSTRY_CATEGORIES.contains(&value) {
            Ok(Self(value.to_string()))
        } else {
            Err(DomainError::UnknownIndustry(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_unselected(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IndustryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
