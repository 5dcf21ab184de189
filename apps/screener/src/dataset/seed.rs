//! Built-in balanced dataset used when no labeled data exists yet.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::dataset::DatasetRecord;
use crate::fields::JobField;

pub const ROWS_PER_FIELD: usize = 80;

const EXPERIENCE_LEVELS: [&str; 3] = ["Junior", "Mid", "Senior"];

const SOFTWARE_ENGINEERING_SAMPLES: &[&str] = &[
    "Senior software engineer with 8 years of full-stack development in Python, JavaScript, React and Node.js. Designed microservices on AWS with Docker and Kubernetes, owned CI/CD pipelines and cut deployment time by 70%. Mentored a team of six engineers using agile and test-driven development.",
    "Backend developer building high-throughput REST APIs in Java and Spring Boot. Operated Kafka event pipelines handling 50K messages per second, tuned PostgreSQL queries and Redis caches, and introduced Prometheus and Grafana monitoring across all services.",
    "Frontend engineer focused on TypeScript, React and Angular single page applications. Built a shared component library, improved Lighthouse performance scores by 35% and partnered with designers on accessible, responsive interfaces tested with Jest and Cypress.",
    "DevOps engineer automating cloud infrastructure with Terraform, Ansible and GitHub Actions. Migrated legacy workloads to Kubernetes on Azure and Google Cloud, built infrastructure as code modules and reduced hosting cost by 25% through rightsizing.",
    "Mobile developer shipping iOS and Android apps in Swift, Kotlin and React Native. Integrated GraphQL APIs, implemented offline sync with SQLite and raised crash-free sessions to 99.8% with automated testing and staged releases.",
    "Machine learning engineer deploying TensorFlow and PyTorch models behind Python FastAPI services. Built feature stores on Spark, containerized inference with Docker and set up model monitoring for drift in production systems serving millions of requests.",
    "Site reliability engineer responsible for Linux fleet operations, incident response and capacity planning. Wrote Python and Go tooling for automated remediation, led debugging of production outages, defined SLOs with Prometheus alerting and reduced mean time to recovery by 40%.",
];

const DATA_ANALYST_SAMPLES: &[&str] = &[
    "Data analyst with 6 years of experience in SQL, Python and Tableau. Built executive dashboards tracking KPIs for sales and finance, ran A/B testing programs and delivered statistical analysis that lifted customer retention by 20%.",
    "Marketing analyst specializing in Google Analytics, cohort analysis and attribution modeling. Used R and pandas for customer segmentation, automated weekly reporting in Excel and Power BI and improved campaign ROI by 30%.",
    "Financial data analyst building forecasting models in Excel and SQL. Performed variance analysis on multi-million budgets, automated month-end reporting with Python scripts and documented data quality rules for the finance data warehouse.",
    "Business intelligence analyst designing ETL workflows with Airflow and dbt into Snowflake. Created Looker and Power BI dashboards, defined metrics with stakeholders and trained business users on self-service analytics.",
    "Healthcare data analyst applying statistics and regression models to patient outcome data. Worked in R and SAS, built readmission risk scorecards and presented findings to clinical leadership with clear data visualization.",
    "Operations analyst using data mining and time series forecasting for inventory planning. Wrote complex SQL against the data warehouse, prototyped models with numpy and scikit-learn and reduced stockouts by 15%.",
    "Product analyst measuring user engagement with Mixpanel, SQL and Python. Designed experiment frameworks, built funnel and retention reports in Tableau and turned insights into roadmap recommendations for product managers.",
];

const CONSULTANT_SAMPLES: &[&str] = &[
    "Management consultant with 7 years of experience leading strategy and digital transformation engagements for Fortune 500 clients. Ran stakeholder workshops, built business cases and guided change management programs that saved $40M.",
    "Strategy consultant focused on market entry, competitive analysis and financial modeling. Structured client problems, led due diligence for acquisitions and presented recommendations to C-level executives with strong communication and presentation skills.",
    "IT consultant managing ERP implementations and technology roadmaps for mid-market companies. Led vendor selection, process improvement and user training while maintaining client relationships and delivering projects on budget.",
    "Operations consultant and Lean Six Sigma Black Belt improving manufacturing throughput by 30%. Facilitated value stream mapping, coached cross-functional teams on process improvement and leadership and tracked results with KPI scorecards.",
    "Financial advisory consultant supporting mergers, valuations and risk assessment. Negotiated deal terms with stakeholders, built scenario analysis models and led client presentations for transactions above $200M.",
    "Organizational change consultant specializing in leadership development and operating model design. Conducted stakeholder management interviews, designed communication plans and drove adoption for a 5,000 person business transformation.",
    "Risk and compliance consultant helping financial services clients meet regulatory requirements. Performed gap analyses, designed control frameworks and managed client engagement workstreams with strong problem solving and negotiation.",
];

pub fn samples_for(field: JobField) -> &'static [&'static str] {
    match field {
        JobField::SoftwareEngineering => SOFTWARE_ENGINEERING_SAMPLES,
        JobField::DataAnalyst => DATA_ANALYST_SAMPLES,
        JobField::Consultant => CONSULTANT_SAMPLES,
    }
}

/// Builds `ROWS_PER_FIELD` rows per field by cycling the sample texts.
/// Ids run globally (`SOF_001` … `CON_240`); metadata columns are drawn from
/// an RNG seeded with `seed` and dates count back from `today`.
pub fn seed_dataset(today: NaiveDate, seed: u64) -> Vec<DatasetRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(ROWS_PER_FIELD * JobField::ALL.len());
    let mut counter = 1;

    for field in JobField::ALL {
        for text in samples_for(field).iter().cycle().take(ROWS_PER_FIELD) {
            let days_back = rng.random_range(1..=90);
            records.push(DatasetRecord {
                id: Some(format!("{}_{:03}", field.id_prefix(), counter)),
                resume_text: text.to_string(),
                job_field: field.display_name().to_string(),
                experience_level: EXPERIENCE_LEVELS.choose(&mut rng).map(|s| s.to_string()),
                ats_score: Some(rng.random_range(70..=98) as f64),
                skills_count: Some(rng.random_range(8..=20)),
                created_date: Some(today - Duration::days(days_back)),
            });
            counter += 1;
        }
    }
    records
}
