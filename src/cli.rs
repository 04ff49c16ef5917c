//! Command execution and terminal rendering
//!
//! Each command drives one library operation and prints its result. Errors
//! are turned into the inline message a user should see; the details go to
//! the log.

use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Result};
use hobby_client::{
    api::AppState,
    error::AppError,
    models::{
        Gathering, GatheringFilters, Hobby, HobbyFilters, LoginRequest, NewGathering,
        QuestionKey, RatingRequest,
    },
    services::{
        account::{self, SignupForm},
        Badge, CatalogBrowser, GatheringBrowser, RecommendationView, SurveyFlow,
    },
};
use serde::Serialize;

use crate::Command;

/// Turns a library error into the message printed for the user
fn inline(fallback: &'static str) -> impl FnOnce(AppError) -> anyhow::Error {
    move |e| {
        tracing::debug!(error = %e, "Command failed");
        anyhow!(e.user_message(fallback))
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn stars(average: f64) -> String {
    let filled = average.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn print_hobby_line(hobby: &Hobby) {
    let stats = hobby.rating();
    println!(
        "  [{:>3}] {} ({}) {} {:.1} ({}) · {} · {}",
        hobby.hobby_id,
        hobby.name,
        hobby.category,
        stars(stats.average_rating),
        stats.average_rating,
        stats.rating_count,
        hobby.indoor_outdoor,
        hobby.required_budget,
    );
}

fn print_gathering_line(gathering: &Gathering) {
    println!(
        "  [{:>3}] {} · {} · {} · {}명",
        gathering.gathering_id,
        gathering.name,
        gathering.region.as_deref().unwrap_or("-"),
        gathering.meeting_type,
        gathering.member_count,
    );
}

pub async fn run(state: &AppState, command: Command, json: bool) -> Result<()> {
    match command {
        Command::Signup {
            username,
            email,
            password,
            password_confirm,
            name,
            birth_year,
            gender,
        } => {
            let form = SignupForm {
                username,
                email,
                password,
                password_confirm,
                name,
                birth_year,
                gender,
            };
            account::signup(&state.api, &form)
                .await
                .map_err(inline("Signup failed."))?;
            println!("Account created. You can log in now.");
        }

        Command::Login { username, password } => {
            let user = state
                .session
                .login(&state.api, &LoginRequest { username, password })
                .await
                .map_err(inline("Login failed."))?;
            println!("Welcome, {}!", user.display_name());
        }

        Command::Logout => {
            state
                .session
                .logout(&state.api)
                .await
                .map_err(inline("Logout failed."))?;
            println!("Logged out.");
        }

        Command::Whoami => match state.session.user() {
            Some(user) if json => print_json(&user)?,
            Some(user) => println!("{} ({})", user.display_name(), user.username),
            None if state.session.is_authenticated() => println!("Signed in (profile unavailable)"),
            None => println!("Not signed in."),
        },

        Command::Survey { answers } => {
            let mut flow = SurveyFlow::new();
            match answers {
                Some(values) => answer_all(&mut flow, &values)?,
                None => answer_interactively(&mut flow)?,
            }
            flow.submit(state.providers.surveys.as_ref())
                .await
                .map_err(inline("Could not submit the survey."))?;
            println!("Thanks! Run `hobby-client recommend` to see your matches.");
        }

        Command::Questions => {
            let questions = state
                .api
                .survey_questions()
                .await
                .map_err(inline("Could not load survey questions."))?;
            if json {
                print_json(&questions)?;
            } else {
                for question in questions {
                    println!("{}. {}", question.question_id, question.question_text);
                }
            }
        }

        Command::Hobbies {
            search,
            category,
            environment,
            social,
            budget,
        } => {
            let mut browser = CatalogBrowser::new(state.providers.catalog.clone());
            let filters = HobbyFilters {
                search,
                category,
                indoor_outdoor: environment,
                social_individual: social,
                budget,
            };
            browser.apply(filters).await;
            if let Some(message) = browser.hobbies().error_message("Could not load hobbies.") {
                bail!(message);
            }
            let hobbies = browser.hobbies().ready().cloned().unwrap_or_default();
            if json {
                print_json(&hobbies)?;
            } else if hobbies.is_empty() {
                println!("No hobbies match these filters.");
            } else {
                println!("{} hobbies", hobbies.len());
                hobbies.iter().for_each(print_hobby_line);
            }
        }

        Command::Categories => {
            let categories = state
                .providers
                .catalog
                .categories()
                .await
                .map_err(inline("Could not load categories."))?;
            if json {
                print_json(&categories)?;
            } else {
                for c in categories {
                    println!("  {} ({})", c.category, c.count);
                }
            }
        }

        Command::Hobby { hobby_id } => {
            let browser = CatalogBrowser::new(state.providers.catalog.clone());
            let detail = browser
                .detail(hobby_id)
                .await
                .map_err(inline("Could not load this hobby."))?;
            let view = RecommendationView::new(
                state.providers.engine.clone(),
                state.config.recommendation_limit,
            );
            // similar hobbies are a bonus; the detail still renders without them
            let similar = view.similar(hobby_id, 0).await.unwrap_or_else(|e| {
                tracing::warn!(hobby_id, error = %e, "Could not load similar hobbies");
                Vec::new()
            });

            if json {
                print_json(&serde_json::json!({ "hobby": detail, "similar": similar }))?;
                return Ok(());
            }

            let hobby = &detail.hobby;
            let stats = hobby.rating();
            println!("{} ({})", hobby.name, hobby.category);
            if let Some(description) = &hobby.description {
                println!("  {}", description);
            }
            println!(
                "  {} {:.1} from {} ratings",
                stars(stats.average_rating),
                stats.average_rating,
                stats.rating_count
            );
            println!(
                "  {} · {} · budget {} · difficulty {}/5 · intensity {}/5 · creativity {}/5",
                hobby.indoor_outdoor,
                hobby.social_individual,
                hobby.required_budget,
                hobby.difficulty_level,
                hobby.physical_intensity,
                hobby.creativity_level
            );
            if let Some(time) = &hobby.time_commitment {
                println!("  Time: {}", time);
            }
            if let Some(url) = &hobby.tutorial_video_url {
                println!("  Tutorial: {}", url);
            }
            if !detail.recent_reviews.is_empty() {
                println!("Recent reviews");
                for review in &detail.recent_reviews {
                    println!(
                        "  {} {}",
                        stars(f64::from(review.rating)),
                        review.review_text.as_deref().unwrap_or("")
                    );
                }
            }
            if !similar.is_empty() {
                println!("Similar hobbies");
                for s in &similar {
                    println!("  {} ({:.1}%)", s.hobby.name, s.similarity_percentage);
                }
            }
        }

        Command::Rate {
            hobby_id,
            rating,
            review,
            experienced,
        } => {
            let browser = CatalogBrowser::new(state.providers.catalog.clone());
            let result = browser
                .rate(
                    hobby_id,
                    &RatingRequest {
                        rating,
                        review_text: review,
                        experienced,
                    },
                )
                .await
                .map_err(inline("Could not save your rating."))?;
            if json {
                print_json(&result)?;
            } else {
                println!(
                    "Rated {} {}. Now {:.1} from {} ratings.",
                    result.hobby_name.as_deref().unwrap_or("hobby"),
                    stars(f64::from(result.rating)),
                    result.updated_stats.average_rating,
                    result.updated_stats.rating_count
                );
            }
        }

        Command::Recommend { limit } => {
            let mut view = RecommendationView::new(
                state.providers.engine.clone(),
                limit.unwrap_or(state.config.recommendation_limit),
            );
            view.load().await;
            if let Some(message) = view
                .recommendations()
                .error_message("Could not load recommendations.")
            {
                bail!(message);
            }
            let recommendations = view.recommendations().ready().cloned().unwrap_or_default();

            if json {
                print_json(&recommendations)?;
            } else if recommendations.is_empty() {
                println!("No recommendations yet.");
            } else {
                for r in &recommendations {
                    let marker = match r.badge() {
                        Badge::TopPick => "★",
                        Badge::RunnerUp => "☆",
                        Badge::Ranked => " ",
                    };
                    println!(
                        "{} {:>2}. {} ({}) match {}",
                        marker, r.rank, r.hobby.name, r.hobby.category, r.match_score
                    );
                }
            }
        }

        Command::Popular { limit } => {
            let view = RecommendationView::new(
                state.providers.engine.clone(),
                state.config.recommendation_limit,
            );
            let popular = view
                .popular(limit)
                .await
                .map_err(inline("Could not load popular hobbies."))?;
            if json {
                print_json(&popular)?;
            } else {
                for (index, p) in popular.iter().enumerate() {
                    println!(
                        "{:>2}. {} {:.2} ({} ratings)",
                        index + 1,
                        p.hobby.name,
                        p.popularity_score,
                        p.rating_count
                    );
                }
            }
        }

        Command::Similar { hobby_id, limit } => {
            let view = RecommendationView::new(
                state.providers.engine.clone(),
                state.config.recommendation_limit,
            );
            let similar = view
                .similar(hobby_id, limit)
                .await
                .map_err(inline("Could not load similar hobbies."))?;
            if json {
                print_json(&similar)?;
            } else {
                for s in &similar {
                    println!("  {} ({:.1}%)", s.hobby.name, s.similarity_percentage);
                }
            }
        }

        Command::Gatherings {
            hobby_id,
            region,
            meeting_type,
            search,
        } => {
            let mut browser = GatheringBrowser::new(state.api.clone());
            browser
                .apply(GatheringFilters {
                    hobby_id,
                    region,
                    meeting_type,
                    search,
                })
                .await;
            if let Some(message) = browser.gatherings().error_message("Could not load gatherings.") {
                bail!(message);
            }
            let gatherings = browser.gatherings().ready().cloned().unwrap_or_default();
            if json {
                print_json(&gatherings)?;
            } else if gatherings.is_empty() {
                println!("No gatherings found.");
            } else {
                gatherings.iter().for_each(print_gathering_line);
            }
        }

        Command::Gathering { gathering_id } => {
            let browser = GatheringBrowser::new(state.api.clone());
            let gathering = browser
                .detail(gathering_id)
                .await
                .map_err(inline("Could not load this gathering."))?;
            if json {
                print_json(&gathering)?;
            } else {
                print_gathering_line(&gathering);
                for (label, value) in [
                    ("Hobby", gathering.hobby.as_ref().map(|h| h.name.as_str())),
                    ("About", gathering.description.as_deref()),
                    ("Where", gathering.location.as_deref()),
                    ("When", gathering.schedule_info.as_deref()),
                    ("Contact", gathering.contact_info.as_deref()),
                    ("Website", gathering.website_url.as_deref()),
                ] {
                    if let Some(value) = value {
                        println!("  {}: {}", label, value);
                    }
                }
            }
        }

        Command::CreateGathering {
            hobby_id,
            name,
            region,
            meeting_type,
            description,
            location,
            schedule,
            contact,
            website,
        } => {
            let browser = GatheringBrowser::new(state.api.clone());
            let gathering = browser
                .create(&NewGathering {
                    hobby_id,
                    name,
                    region,
                    meeting_type,
                    description,
                    location,
                    schedule_info: schedule,
                    contact_info: contact,
                    website_url: website,
                })
                .await
                .map_err(inline("Could not create the gathering."))?;
            println!("Created gathering #{}: {}", gathering.gathering_id, gathering.name);
        }

        Command::Regions => {
            let browser = GatheringBrowser::new(state.api.clone());
            let regions = browser
                .regions()
                .await
                .map_err(inline("Could not load regions."))?;
            if json {
                print_json(&regions)?;
            } else {
                for r in regions {
                    println!("  {} ({})", r.region, r.count);
                }
            }
        }
    }

    Ok(())
}

/// Feeds `--answers` through the flow in question order
fn answer_all(flow: &mut SurveyFlow, values: &[String]) -> Result<()> {
    if values.len() != QuestionKey::ALL.len() {
        bail!(
            "Expected {} answers ({}), got {}",
            QuestionKey::ALL.len(),
            QuestionKey::ALL.map(|k| k.as_str()).join(", "),
            values.len()
        );
    }
    for value in values {
        flow.answer_current(value.trim())
            .map_err(inline("Invalid answer."))?;
        flow.advance();
    }
    Ok(())
}

/// Asks one question at a time on stdin. `b` goes back a question.
fn answer_interactively(flow: &mut SurveyFlow) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while let Some(question) = flow.current() {
        println!();
        println!(
            "[{}/{}] {:.0}% {}",
            QuestionKey::ALL.iter().position(|k| *k == question).unwrap_or(0) + 1,
            QuestionKey::ALL.len(),
            flow.progress_percent(),
            question.prompt()
        );
        for (index, option) in question.options().iter().enumerate() {
            let chosen = flow.responses().get(question) == Some(option.value);
            println!("  {}) {}{}", index + 1, option.label, if chosen { " ✓" } else { "" });
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            bail!("Survey cancelled.");
        };
        let input = line?.trim().to_string();

        if input.eq_ignore_ascii_case("b") {
            flow.retreat();
            continue;
        }

        let value = match input.parse::<usize>() {
            Ok(n) if (1..=question.options().len()).contains(&n) => question.options()[n - 1].value,
            _ => input.as_str(),
        };
        if let Err(e) = flow.answer(question, value) {
            println!("{}", e.user_message("Please pick one of the options."));
            continue;
        }

        if !flow.advance() {
            // last question answered
            break;
        }
    }
    Ok(())
}
