use leadlens_core::{ManualCompanyFields, ProfileRecord};

use crate::keywords::{self, flag, tokenize};
use crate::parse::{
    activity_score, parse_revenue_millions, parse_size_to_number, revenue_category, revenue_score,
    size_score,
};
use crate::vector::{DebugTrace, FeatureVector};

/// Neutral missing-data fallback for `activity_days`: treat a profile with
/// no usable post timestamp as moderately active (30 days), matching the
/// policy the served artifact was trained with. The worst-case-180 policy
/// observed in earlier drafts of the training pipeline is intentionally not
/// used here.
pub const ACTIVITY_FALLBACK_DAYS: f64 = 30.0;

/// Upper clamp for `activity_days`; anything older is "inactive".
const ACTIVITY_MAX_DAYS: f64 = 180.0;

/// Derives the fixed-schema feature vector for one subject.
///
/// Pure and total: no I/O, and every input — including `profile: None` and
/// all-empty manual fields — yields a fully populated vector. Malformed
/// sub-fields degrade to zero/neutral values silently; the debug trace
/// records every raw input and derived value for operator inspection.
#[must_use]
#[allow(clippy::too_many_lines, clippy::cast_precision_loss)]
pub fn derive(
    profile: Option<&ProfileRecord>,
    manual: &ManualCompanyFields,
) -> (FeatureVector, DebugTrace) {
    let mut trace = DebugTrace::default();

    // Title: current experience entry, else first entry, else headline.
    let title = profile.map_or("", |p| {
        p.current_experience()
            .map(|e| e.title.as_str())
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(p.headline.as_str())
    });
    let title_l = title.trim().to_lowercase();
    let title_tokens = tokenize(&title_l);

    trace.push("title", title);
    trace.push("company_name_raw", manual.company_name.as_str());
    trace.push("company_size_raw", manual.company_size.as_str());
    trace.push("annual_revenue_raw", manual.annual_revenue.as_str());
    trace.push("industry_raw", manual.industry.as_str());

    // Seniority flags. Deliberately non-exclusive: one title may set several.
    let is_ceo = flag(&title_tokens, keywords::CEO);
    let is_c_level = flag(&title_tokens, keywords::C_LEVEL);
    let is_evp_svp = flag(&title_tokens, keywords::EVP_SVP);
    let is_vp = flag(&title_tokens, keywords::VP);
    let is_director = flag(&title_tokens, keywords::DIRECTOR);
    let is_manager = flag(&title_tokens, keywords::MANAGER);
    let is_officer = flag(&title_tokens, keywords::OFFICER);

    // Department flags.
    let in_lending = flag(&title_tokens, keywords::LENDING);
    let in_tech = flag(&title_tokens, keywords::TECH);
    let in_operations = flag(&title_tokens, keywords::OPERATIONS);
    let in_risk = flag(&title_tokens, keywords::RISK);
    let in_finance = flag(&title_tokens, keywords::FINANCE);
    let in_strategy = flag(&title_tokens, keywords::STRATEGY);

    let designation_length = title_l.chars().count() as i64;
    let designation_word_count = title_l.split_whitespace().count() as i64;

    let seniority_score = is_ceo * keywords::WEIGHT_CEO
        + is_c_level * keywords::WEIGHT_C_LEVEL
        + is_evp_svp * keywords::WEIGHT_EVP_SVP
        + is_vp * keywords::WEIGHT_VP
        + is_director * keywords::WEIGHT_DIRECTOR
        + is_manager * keywords::WEIGHT_MANAGER
        + is_officer * keywords::WEIGHT_OFFICER;

    let dept_score = in_lending * keywords::WEIGHT_LENDING
        + in_finance * keywords::WEIGHT_FINANCE
        + in_risk * keywords::WEIGHT_RISK
        + in_strategy * keywords::WEIGHT_STRATEGY
        + in_tech * keywords::WEIGHT_TECH
        + in_operations * keywords::WEIGHT_OPERATIONS;

    // Company size. The bucket flags overlap at exactly 5000 employees:
    // both size_1001_5000 and size_5000_plus fire there. The frozen
    // artifact was trained against this boundary; keep it when retraining.
    let size_numeric = parse_size_to_number(&manual.company_size);
    let size_51_200 = i64::from((51..=200).contains(&size_numeric));
    let size_201_500 = i64::from((201..=500).contains(&size_numeric));
    let size_501_1000 = i64::from((501..=1000).contains(&size_numeric));
    let size_1001_5000 = i64::from((1001..=5000).contains(&size_numeric));
    let size_5000_plus = i64::from(size_numeric >= 5000);
    let size_score_v = size_score(size_numeric);

    // Revenue.
    let revenue_millions = parse_revenue_millions(&manual.annual_revenue);
    let revenue_category_v = revenue_category(revenue_millions);
    let revenue_score_v = revenue_score(revenue_millions);

    // Activity recency: fall back to neutral when no post timestamp was
    // usable, then clamp to the modeled range.
    let activity_days_raw = profile.and_then(|p| p.activity_days);
    let activity_days = activity_days_raw
        .map_or(ACTIVITY_FALLBACK_DAYS, |d| d as f64)
        .clamp(0.0, ACTIVITY_MAX_DAYS);
    if activity_days_raw.is_none() {
        tracing::debug!(
            fallback_days = ACTIVITY_FALLBACK_DAYS,
            "no post activity available; using neutral fallback"
        );
    }
    let is_active_week = i64::from(activity_days <= 7.0);
    let is_active_month = i64::from(activity_days <= 30.0);
    let activity_score_v = activity_score(activity_days);

    trace.push("activity_days_raw", activity_days_raw);
    trace.push("activity_days_used", activity_days);

    // Industry flags come from the manual entry only; there is no company
    // data API in scope.
    let industry_tokens = tokenize(&manual.industry);
    let is_consumer_lending = i64::from(
        flag(&industry_tokens, keywords::IND_CONSUMER) == 1
            && flag(&industry_tokens, keywords::IND_LENDING) == 1,
    );
    let is_commercial_banking = flag(&industry_tokens, keywords::IND_COMMERCIAL);
    let is_retail_banking = flag(&industry_tokens, keywords::IND_RETAIL);
    let is_fintech = flag(&industry_tokens, keywords::IND_FINTECH);
    let is_credit_union = flag(&industry_tokens, keywords::IND_CREDIT_UNION);

    // Composite scores are modeled features themselves, not debug aids.
    let desig_score = seniority_score + dept_score;

    let vector = FeatureVector::from_entries(vec![
        ("is_ceo", is_ceo as f64),
        ("is_c_level", is_c_level as f64),
        ("is_evp_svp", is_evp_svp as f64),
        ("is_vp", is_vp as f64),
        ("is_director", is_director as f64),
        ("is_manager", is_manager as f64),
        ("is_officer", is_officer as f64),
        ("in_lending", in_lending as f64),
        ("in_tech", in_tech as f64),
        ("in_operations", in_operations as f64),
        ("in_risk", in_risk as f64),
        ("in_finance", in_finance as f64),
        ("in_strategy", in_strategy as f64),
        ("designation_length", designation_length as f64),
        ("designation_word_count", designation_word_count as f64),
        ("seniority_score", seniority_score as f64),
        ("dept_score", dept_score as f64),
        ("size_numeric", size_numeric as f64),
        ("size_51_200", size_51_200 as f64),
        ("size_201_500", size_201_500 as f64),
        ("size_501_1000", size_501_1000 as f64),
        ("size_1001_5000", size_1001_5000 as f64),
        ("size_5000_plus", size_5000_plus as f64),
        ("revenue_millions", revenue_millions),
        ("revenue_category", revenue_category_v as f64),
        ("activity_days", activity_days),
        ("is_active_week", is_active_week as f64),
        ("is_active_month", is_active_month as f64),
        ("is_consumer_lending", is_consumer_lending as f64),
        ("is_commercial_banking", is_commercial_banking as f64),
        ("is_retail_banking", is_retail_banking as f64),
        ("is_fintech", is_fintech as f64),
        ("is_credit_union", is_credit_union as f64),
        ("Desig_Score", desig_score as f64),
        ("Size_Score", size_score_v as f64),
        ("Revenue_Score", revenue_score_v as f64),
        ("Activity_Score", activity_score_v as f64),
    ]);

    for (name, value) in vector.entries() {
        trace.push(name, value);
    }

    (vector, trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use leadlens_core::Experience;

    fn profile_with_title(title: &str) -> ProfileRecord {
        ProfileRecord {
            full_name: "Jordan Example".to_owned(),
            headline: "Banking professional".to_owned(),
            experience: vec![Experience {
                title: title.to_owned(),
                company: "First National".to_owned(),
                is_current: true,
                company_url: None,
            }],
            location: "Austin, TX".to_owned(),
            activity_days: None,
        }
    }

    fn manual(size: &str, revenue: &str, industry: &str) -> ManualCompanyFields {
        ManualCompanyFields {
            company_name: "First National".to_owned(),
            company_size: size.to_owned(),
            annual_revenue: revenue.to_owned(),
            industry: industry.to_owned(),
        }
    }

    #[test]
    fn derive_is_total_on_empty_input() {
        let (vector, trace) = derive(None, &ManualCompanyFields::default());
        assert_eq!(vector.len(), crate::FEATURE_NAMES.len());
        for name in [
            "is_ceo",
            "is_vp",
            "in_lending",
            "is_fintech",
            "size_numeric",
        ] {
            assert_eq!(vector.get(name), Some(0.0), "expected {name} = 0");
        }
        assert_eq!(vector.get("revenue_millions"), Some(0.0));
        assert_eq!(vector.get("activity_days"), Some(ACTIVITY_FALLBACK_DAYS));
        assert_eq!(vector.get("Activity_Score"), Some(4.0));
        assert!(trace.get("title").is_some());
    }

    #[test]
    fn derive_is_deterministic() {
        let profile = profile_with_title("SVP, Consumer Lending");
        let manual = manual("501-1,000 employees", "$75 Million", "Consumer Lending");
        let (a, _) = derive(Some(&profile), &manual);
        let (b, _) = derive(Some(&profile), &manual);
        let pairs: Vec<_> = a.entries().zip(b.entries()).collect();
        for ((name_a, va), (name_b, vb)) in pairs {
            assert_eq!(name_a, name_b);
            assert!(
                (va - vb).abs() < f64::EPSILON,
                "{name_a} differed between runs"
            );
        }
    }

    #[test]
    fn vp_title_sets_vp_only() {
        let profile = profile_with_title("VP of Development");
        let (vector, _) = derive(Some(&profile), &ManualCompanyFields::default());
        assert_eq!(vector.get("is_vp"), Some(1.0));
        assert_eq!(vector.get("is_ceo"), Some(0.0));
    }

    #[test]
    fn developer_title_does_not_set_vp() {
        let profile = profile_with_title("Senior Software Developer");
        let (vector, _) = derive(Some(&profile), &ManualCompanyFields::default());
        assert_eq!(vector.get("is_vp"), Some(0.0));
    }

    #[test]
    fn title_falls_back_to_headline_without_experience() {
        let profile = ProfileRecord {
            full_name: String::new(),
            headline: "Fractional CFO".to_owned(),
            experience: vec![],
            location: String::new(),
            activity_days: None,
        };
        let (vector, trace) = derive(Some(&profile), &ManualCompanyFields::default());
        assert_eq!(trace.get("title").unwrap(), "Fractional CFO");
        assert_eq!(vector.get("is_c_level"), Some(1.0));
        assert_eq!(vector.get("in_finance"), Some(1.0));
    }

    #[test]
    fn mid_range_size_sets_a_single_bucket_flag() {
        let (vector, _) = derive(None, &manual("201-500 employees", "", ""));
        assert_eq!(vector.get("size_numeric"), Some(350.0));
        assert_eq!(vector.get("size_201_500"), Some(1.0));
        for other in [
            "size_51_200",
            "size_501_1000",
            "size_1001_5000",
            "size_5000_plus",
        ] {
            assert_eq!(vector.get(other), Some(0.0), "expected {other} = 0");
        }
        assert_eq!(vector.get("Size_Score"), Some(3.0));
    }

    #[test]
    fn size_boundary_at_5000_sets_both_top_buckets() {
        let (vector, _) = derive(None, &manual("5,000", "", ""));
        assert_eq!(vector.get("size_numeric"), Some(5000.0));
        assert_eq!(vector.get("size_1001_5000"), Some(1.0));
        assert_eq!(vector.get("size_5000_plus"), Some(1.0));
        assert_eq!(vector.get("Size_Score"), Some(5.0));
    }

    #[test]
    fn large_size_sets_five_thousand_plus() {
        let (vector, _) = derive(None, &manual("10,000+", "", ""));
        assert_eq!(vector.get("size_numeric"), Some(10000.0));
        assert_eq!(vector.get("size_5000_plus"), Some(1.0));
        assert_eq!(vector.get("size_1001_5000"), Some(0.0));
    }

    #[test]
    fn unparsable_size_leaves_all_flags_zero() {
        let (vector, _) = derive(None, &manual("abc", "", ""));
        assert_eq!(vector.get("size_numeric"), Some(0.0));
        for name in [
            "size_51_200",
            "size_201_500",
            "size_501_1000",
            "size_1001_5000",
            "size_5000_plus",
        ] {
            assert_eq!(vector.get(name), Some(0.0));
        }
        assert_eq!(vector.get("Size_Score"), Some(0.0));
    }

    #[test]
    fn revenue_examples_from_contract() {
        let (vector, _) = derive(None, &manual("", "$261.9 Million", ""));
        assert!((vector.get("revenue_millions").unwrap() - 261.9).abs() < 1e-9);
        assert_eq!(vector.get("revenue_category"), Some(3.0));

        let (vector, _) = derive(None, &manual("", "$1.3 Billion", ""));
        assert!((vector.get("revenue_millions").unwrap() - 1300.0).abs() < 1e-9);
        assert_eq!(vector.get("revenue_category"), Some(4.0));

        let (vector, _) = derive(None, &manual("", "", ""));
        assert_eq!(vector.get("revenue_millions"), Some(0.0));
        assert_eq!(vector.get("revenue_category"), Some(0.0));
    }

    #[test]
    fn recent_activity_sets_week_and_month_flags() {
        let mut profile = profile_with_title("Manager");
        profile.activity_days = Some(3);
        let (vector, _) = derive(Some(&profile), &ManualCompanyFields::default());
        assert_eq!(vector.get("activity_days"), Some(3.0));
        assert_eq!(vector.get("is_active_week"), Some(1.0));
        assert_eq!(vector.get("is_active_month"), Some(1.0));
        assert_eq!(vector.get("Activity_Score"), Some(5.0));
    }

    #[test]
    fn stale_activity_clamps_to_180() {
        let mut profile = profile_with_title("Manager");
        profile.activity_days = Some(400);
        let (vector, _) = derive(Some(&profile), &ManualCompanyFields::default());
        assert_eq!(vector.get("activity_days"), Some(180.0));
        assert_eq!(vector.get("is_active_week"), Some(0.0));
        assert_eq!(vector.get("is_active_month"), Some(0.0));
        assert_eq!(vector.get("Activity_Score"), Some(1.0));
    }

    #[test]
    fn consumer_lending_requires_both_terms() {
        let (vector, _) = derive(None, &manual("", "", "Consumer Lending"));
        assert_eq!(vector.get("is_consumer_lending"), Some(1.0));

        let (vector, _) = derive(None, &manual("", "", "Consumer Electronics"));
        assert_eq!(vector.get("is_consumer_lending"), Some(0.0));
    }

    #[test]
    fn composite_scores_sum_seniority_and_department() {
        // "SVP, Consumer Lending": evp_svp(4) + vp(0; "svp" is its own token)
        // lending(3) -> Desig_Score 7.
        let profile = profile_with_title("SVP, Consumer Lending");
        let (vector, _) = derive(Some(&profile), &ManualCompanyFields::default());
        assert_eq!(vector.get("seniority_score"), Some(4.0));
        assert_eq!(vector.get("dept_score"), Some(3.0));
        assert_eq!(vector.get("Desig_Score"), Some(7.0));
    }

    #[test]
    fn end_to_end_cfo_scenario() {
        let profile = profile_with_title("Chief Financial Officer");
        let manual = manual(
            "5,001-10,000 employees",
            "$1 Billion",
            "Commercial Banking",
        );
        let (vector, trace) = derive(Some(&profile), &manual);
        assert_eq!(vector.get("is_c_level"), Some(1.0));
        assert_eq!(vector.get("in_finance"), Some(1.0));
        assert_eq!(vector.get("size_numeric"), Some(7500.0));
        assert_eq!(vector.get("size_5000_plus"), Some(1.0));
        assert_eq!(vector.get("revenue_millions"), Some(1000.0));
        assert_eq!(vector.get("revenue_category"), Some(4.0));
        assert_eq!(vector.get("is_commercial_banking"), Some(1.0));
        assert_eq!(vector.get("activity_days"), Some(ACTIVITY_FALLBACK_DAYS));
        assert_eq!(
            trace.get("activity_days_used").unwrap(),
            &serde_json::json!(ACTIVITY_FALLBACK_DAYS)
        );
    }

    #[test]
    fn trace_records_raw_inputs_and_every_feature() {
        let profile = profile_with_title("Director of Risk");
        let manual = manual("51-200", "50M", "Retail Banking");
        let (vector, trace) = derive(Some(&profile), &manual);
        assert_eq!(trace.get("company_size_raw").unwrap(), "51-200");
        for (name, value) in vector.entries() {
            assert_eq!(
                trace.get(name).unwrap(),
                &serde_json::json!(value),
                "trace missing or wrong for {name}"
            );
        }
    }
}
