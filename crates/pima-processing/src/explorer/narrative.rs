//! Fixed prose shown alongside the views.

use once_cell::sync::Lazy;
use std::collections::HashMap;

pub const INTRODUCTION_TITLE: &str = "Pima Indians Diabetes Data Exploration";

pub const INTRODUCTION: &str = "\
This report explores the Pima Indians Diabetes Dataset \
(https://www.kaggle.com/datasets/uciml/pima-indians-diabetes-database) sourced from Kaggle. \
The dataset consists of medical data from female patients aged 21 years and older from the \
Pima Indian population, an indigenous group in the United States. The primary focus of the \
dataset is to predict the likelihood of diabetes based on various health metrics.

The Pima Indian population has historically faced higher rates of diabetes than the general \
population, making this dataset particularly relevant for understanding risk factors associated \
with diabetes in this community. The dataset includes features such as:

  - Pregnancies: Number of times the patient has been pregnant.
  - Glucose: Plasma glucose concentration after a 2-hour oral glucose tolerance test.
  - Blood Pressure: Diastolic blood pressure (mm Hg).
  - Skin Thickness: Triceps skinfold thickness (mm).
  - Insulin: 2-hour serum insulin (mu U/ml).
  - BMI: Body mass index (weight in kg/(height in m)^2).
  - Diabetes Pedigree Function: A function that scores the likelihood of diabetes based on family history.
  - Age: Age of the patient.

The dataset contains 768 observations with binary labels indicating whether or not the patient \
tested positive for diabetes. The purpose of this exploration is to gain insights into the \
underlying factors contributing to diabetes risk. By analyzing the distribution and relationships \
between these features, we aim to highlight key predictors of diabetes, which can ultimately \
inform prevention strategies and potential interventions for at-risk individuals.

Through visualizations such as histograms, box plots, and correlation heatmaps, we will examine \
the significance of various health metrics and how they contribute to the onset of diabetes. \
This exploration serves as an important step in understanding how certain biological and genetic \
factors, as well as lifestyle choices, play a role in determining diabetes outcomes in the Pima \
Indian population.";

pub const CONCLUSION_TITLE: &str = "Conclusion";

pub const CONCLUSION: &str = "\
In this exploration of the Pima Indians Diabetes Dataset, several key insights were identified:

  1. Pregnancy and Diabetes Risk: The data shows that the number of pregnancies is an important \
factor in assessing diabetes risk. Many patients with multiple pregnancies exhibited higher \
chances of diabetes, suggesting that pregnancy-related changes in the body can influence \
long-term health outcomes.

  2. Glucose Levels as a Major Indicator: The dataset reveals that glucose levels are a critical \
predictor of diabetes. Elevated glucose levels were observed in many patients with diabetes, \
reaffirming its role as a primary risk factor.

  3. BMI and Weight Management: A significant portion of the patients had high BMI, correlating \
with a greater risk of developing diabetes. This finding highlights the importance of \
maintaining a healthy weight to reduce diabetes risks.

  4. Age as a Contributing Factor: Age was strongly associated with diabetes incidence, with \
older patients showing a higher prevalence of diabetes. This suggests that age, along with \
other factors like genetics and lifestyle, plays a significant role in diabetes onset.

  5. Insulin Levels and Resistance: Many patients with lower insulin levels or potential \
insulin resistance were identified, reinforcing the connection between insulin regulation and \
diabetes development.

  6. Correlation Insights: The correlation heatmap highlighted key relationships between \
features such as glucose, BMI, and age. These relationships suggest that glucose and BMI are \
intertwined in predicting diabetes risk, and age amplifies the overall risk profile.

Key Takeaways:
  - Health metrics such as glucose, BMI, insulin levels, and age are strong indicators of diabetes risk.
  - Lifestyle and genetic predisposition, as seen in factors like BMI and the Diabetes Pedigree \
Function, significantly influence diabetes outcomes.
  - Early detection and management of risk factors, including weight management and glucose \
regulation, are crucial for diabetes prevention.

Overall, this exploration provides a deeper understanding of the key factors driving diabetes \
risk in this population. These insights can guide future predictive modeling and help focus \
efforts on prevention strategies.";

pub const HEATMAP_ANALYSIS: &str = "\
The heatmap shows how different features relate to each other. Strong correlations, such as \
between glucose and BMI, indicate potential links to diabetes risk. These insights help in \
selecting important features for diabetes prediction models.";

// Histogram commentary keyed by column name
static HISTOGRAM_ANALYSIS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "Pregnancies",
            "The histogram for Pregnancies indicates the distribution of the number of \
pregnancies among patients. A significant number of patients have between 0 to 3 pregnancies, \
suggesting a common pattern. Understanding this can help in predicting diabetes risk related to \
pregnancy history.",
        ),
        (
            "Glucose",
            "The histogram for Glucose levels shows a right-skewed distribution, with many \
patients having glucose levels below the average. Higher glucose levels are a known risk factor \
for diabetes, and this visualization highlights the prevalence of elevated glucose in some \
individuals.",
        ),
        (
            "Insulin",
            "The histogram for Insulin levels reveals a concentration of patients with lower \
insulin levels, indicating potential insulin resistance. Monitoring insulin levels can be \
crucial in diabetes prediction.",
        ),
        (
            "BMI",
            "The histogram for BMI demonstrates that most patients fall within the overweight \
category, which may contribute to higher diabetes risk. This emphasizes the importance of weight \
management in diabetes prevention strategies.",
        ),
        (
            "DiabetesPedigreeFunction",
            "The histogram for Diabetes Pedigree Function indicates that many patients have low \
scores, suggesting fewer genetic predispositions to diabetes. However, higher scores still \
warrant attention for diabetes risk evaluation.",
        ),
        (
            "Age",
            "The histogram for Age illustrates that the majority of patients are in the \
middle-aged group, which aligns with higher diabetes incidence rates in this demographic. Age is \
a significant factor in diabetes risk assessment.",
        ),
        (
            "BloodPressure",
            "The histogram for Blood Pressure shows a peak at lower values, indicating many \
patients have normal blood pressure levels. Monitoring blood pressure is essential, as it can \
influence diabetes outcomes.",
        ),
        (
            "SkinThickness",
            "The histogram for Skin Thickness illustrates the distribution of skin fold thickness \
measurements. A concentration of low measurements may suggest a lower risk of diabetes, but \
values above average should be closely monitored.",
        ),
    ])
});

/// Commentary for the histogram of `column`, if there is any.
pub fn histogram_analysis(column: &str) -> Option<&'static str> {
    HISTOGRAM_ANALYSIS.get(column).copied()
}

/// Commentary for the box plot of `column`.
pub fn box_plot_analysis(column: &str) -> String {
    format!(
        "The box plot for {} shows the spread of data, highlighting the median, variability, \
and outliers. Extreme values may indicate patients with unusual conditions that could influence \
diabetes outcomes.",
        column
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TREATED_COLUMNS;

    #[test]
    fn test_every_treated_column_has_histogram_analysis() {
        for column in TREATED_COLUMNS {
            let text = histogram_analysis(column).unwrap();
            assert!(text.starts_with("The histogram for"));
        }
    }

    #[test]
    fn test_other_columns_have_no_histogram_analysis() {
        assert_eq!(histogram_analysis("Outcome"), None);
        assert_eq!(histogram_analysis("glucose"), None);
    }

    #[test]
    fn test_box_plot_analysis_names_column() {
        assert!(box_plot_analysis("Insulin").starts_with("The box plot for Insulin shows"));
    }

    #[test]
    fn test_fixed_texts() {
        assert!(INTRODUCTION.contains("768 observations"));
        assert!(CONCLUSION.contains("Key Takeaways:"));
        assert!(HEATMAP_ANALYSIS.contains("glucose and BMI"));
    }
}
