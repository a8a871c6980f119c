use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    health::ports::HealthCheckRepository,
    meal::{
        entities::{MealRecord, UserId},
        helpers::{build_object_key, is_image_key, user_prefix},
        ports::{MealHistoryRepository, MealService, RecognitionClient},
        value_objects::{
            GetNutritionSummaryInput, RecognitionStatus, UploadMealInput, UploadOutcome,
        },
    },
    nutrition::NutritionSummary,
    storage::{entities::StoredImage, ports::ObjectStoragePort},
};

const RECOGNITION_UNAVAILABLE_MESSAGE: &str =
    "Image saved, but the recognition service could not be reached.";

impl<MH, HC, RC, OS> Service<MH, HC, RC, OS>
where
    MH: MealHistoryRepository,
    HC: HealthCheckRepository,
    RC: RecognitionClient,
    OS: ObjectStoragePort,
{
    /// Everything that happens once the image is in the bucket. Any error
    /// returned from here makes the caller delete the written object.
    async fn analyze_and_record(
        &self,
        user: &UserId,
        object_key: &str,
        input: &UploadMealInput,
    ) -> Result<UploadOutcome, CoreError> {
        let image_path = self
            .object_storage
            .object_url(&self.uploads_bucket, object_key)?;

        let recognition = self.recognition_client.analyze(&image_path).await;
        if let Some(error) = &recognition.error {
            warn!(image_path = %image_path, error = %error, "Recognition unavailable, recording empty meal");
        }

        let mut record = MealRecord::new(image_path, recognition.detections);
        let meal_gauges = self.engine.meal_gauges(&record.nutrition);

        let saved_to_history = match user {
            UserId::Anonymous => false,
            UserId::Registered(user_id) => {
                match self
                    .meal_history_repository
                    .append(user_id, record.clone())
                    .await
                {
                    Ok(id) => {
                        record.id = id;
                        true
                    }
                    Err(e) => {
                        warn!(user_id = %user_id, error = %e, "Failed to append meal record");
                        false
                    }
                }
            }
        };

        let summary = if saved_to_history {
            match self.meal_history_repository.list(user.as_str()).await {
                Ok(records) => Some(self.engine.summarize(&records, &input.now)),
                Err(e) => {
                    warn!(user_id = %user, error = %e, "Failed to refresh nutrition summary");
                    None
                }
            }
        } else {
            None
        };

        let message = match recognition.status {
            RecognitionStatus::Completed => None,
            RecognitionStatus::Unavailable => Some(RECOGNITION_UNAVAILABLE_MESSAGE.to_string()),
        };

        Ok(UploadOutcome {
            record,
            saved_to_history,
            recognition: recognition.status,
            message,
            meal_gauges,
            summary,
        })
    }
}

impl<MH, HC, RC, OS> MealService for Service<MH, HC, RC, OS>
where
    MH: MealHistoryRepository,
    HC: HealthCheckRepository,
    RC: RecognitionClient,
    OS: ObjectStoragePort,
{
    #[instrument(skip(self, input), fields(user_id = ?input.user_id))]
    async fn upload_meal(&self, input: UploadMealInput) -> Result<UploadOutcome, CoreError> {
        let image = input
            .image
            .clone()
            .filter(|image| !image.data.is_empty())
            .ok_or(CoreError::MissingImage)?;

        let user = UserId::parse(input.user_id.as_deref())?;

        let object_key = build_object_key(&user, image.filename.as_deref(), Utc::now());

        self.object_storage
            .put_object(
                &self.uploads_bucket,
                &object_key,
                image.data,
                &image.content_type,
            )
            .await?;

        match self.analyze_and_record(&user, &object_key, &input).await {
            Ok(outcome) => {
                info!(
                    user_id = %user,
                    object_key = %object_key,
                    foods = outcome.record.foods.len(),
                    saved_to_history = outcome.saved_to_history,
                    "Meal uploaded"
                );
                Ok(outcome)
            }
            Err(e) => {
                if let Err(cleanup) = self
                    .object_storage
                    .delete_object(&self.uploads_bucket, &object_key)
                    .await
                {
                    warn!(object_key = %object_key, error = %cleanup, "Failed to remove orphaned upload");
                }
                Err(e)
            }
        }
    }

    async fn get_history(&self, user_id: String) -> Result<Vec<MealRecord>, CoreError> {
        let user = UserId::parse(Some(&user_id))?;
        if user.is_anonymous() {
            return Ok(Vec::new());
        }

        self.meal_history_repository.list(user.as_str()).await
    }

    async fn get_nutrition_summary(
        &self,
        input: GetNutritionSummaryInput,
    ) -> Result<NutritionSummary, CoreError> {
        let user = UserId::parse(Some(&input.user_id))?;
        let records = if user.is_anonymous() {
            Vec::new()
        } else {
            self.meal_history_repository.list(user.as_str()).await?
        };

        Ok(self.engine.summarize(&records, &input.now))
    }

    async fn list_images(&self, user_id: String) -> Result<Vec<StoredImage>, CoreError> {
        let user = UserId::parse(Some(&user_id))?;
        if user.is_anonymous() {
            return Ok(Vec::new());
        }

        let prefix = user_prefix(&user);
        let objects = self
            .object_storage
            .list_objects(&self.uploads_bucket, &prefix)
            .await?;

        let mut images = objects
            .into_iter()
            .filter(|object| is_image_key(&object.object_key))
            .map(|object| {
                let url = self
                    .object_storage
                    .object_url(&self.uploads_bucket, &object.object_key)?;
                let filename = object
                    .object_key
                    .strip_prefix(&prefix)
                    .unwrap_or(&object.object_key)
                    .to_string();

                Ok(StoredImage {
                    filename,
                    url,
                    last_modified: object.last_modified,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        images.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use bytes::Bytes;
    use chrono::{FixedOffset, TimeZone, Utc};
    use mockall::predicate::eq;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{
        health::ports::MockHealthCheckRepository,
        meal::{
            entities::Detection,
            ports::{MockMealHistoryRepository, MockRecognitionClient},
            value_objects::{RecognitionResult, UploadedImage},
        },
        nutrition::{NutrientVector, NutritionEngine},
        storage::{entities::ObjectSummary, ports::MockObjectStoragePort},
    };

    type TestService = Service<
        MockMealHistoryRepository,
        MockHealthCheckRepository,
        MockRecognitionClient,
        MockObjectStoragePort,
    >;

    const BUCKET: &str = "meallog-uploads";

    fn service(
        history: MockMealHistoryRepository,
        recognition: MockRecognitionClient,
        storage: MockObjectStoragePort,
    ) -> TestService {
        Service::new(
            history,
            MockHealthCheckRepository::new(),
            recognition,
            storage,
            NutritionEngine::default(),
            BUCKET.to_string(),
        )
    }

    fn upload_input(user_id: Option<&str>, data: &'static [u8]) -> UploadMealInput {
        UploadMealInput {
            user_id: user_id.map(str::to_string),
            image: Some(UploadedImage {
                filename: Some("lunch.jpg".to_string()),
                content_type: "image/jpeg".to_string(),
                data: Bytes::from_static(data),
            }),
            now: Utc::now().with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap()),
        }
    }

    fn storage_accepting_puts() -> MockObjectStoragePort {
        let mut storage = MockObjectStoragePort::new();
        storage
            .expect_put_object()
            .returning(|_, _, _, _| Box::pin(async { Ok(()) }));
        storage
            .expect_object_url()
            .returning(|bucket, key| Ok(format!("http://minio:9000/{bucket}/{key}")));
        storage
    }

    fn kimbap() -> Detection {
        Detection {
            class_id: 3,
            name: "kimbap".to_string(),
            confidence: Some(0.91),
            bounding_box: None,
            nutrition: Some(NutrientVector {
                calories: 480.0,
                carbs: 70.0,
                protein: 14.0,
                fat: 12.0,
                sodium: 900.0,
                sugar: 5.0,
            }),
            solution: None,
        }
    }

    fn background() -> Detection {
        Detection {
            class_id: 0,
            name: "background".to_string(),
            confidence: Some(0.99),
            bounding_box: None,
            nutrition: Some(NutrientVector {
                calories: 1000.0,
                ..NutrientVector::ZERO
            }),
            solution: None,
        }
    }

    #[tokio::test]
    async fn upload_without_image_is_rejected() {
        let service = service(
            MockMealHistoryRepository::new(),
            MockRecognitionClient::new(),
            MockObjectStoragePort::new(),
        );

        let mut input = upload_input(Some("alice"), b"jpeg");
        input.image = None;
        assert_eq!(service.upload_meal(input).await, Err(CoreError::MissingImage));

        let empty = upload_input(Some("alice"), b"");
        assert_eq!(service.upload_meal(empty).await, Err(CoreError::MissingImage));
    }

    #[tokio::test]
    async fn upload_with_invalid_user_is_rejected_before_storage() {
        let service = service(
            MockMealHistoryRepository::new(),
            MockRecognitionClient::new(),
            MockObjectStoragePort::new(),
        );

        let result = service
            .upload_meal(upload_input(Some("../etc"), b"jpeg"))
            .await;

        assert_eq!(result, Err(CoreError::InvalidUserId));
    }

    #[tokio::test]
    async fn upload_records_meal_without_background_detections() {
        let mut recognition = MockRecognitionClient::new();
        recognition.expect_analyze().returning(|_| {
            Box::pin(async { RecognitionResult::completed(vec![kimbap(), background()]) })
        });

        let saved: Arc<std::sync::Mutex<Vec<MealRecord>>> = Arc::default();
        let mut history = MockMealHistoryRepository::new();
        let appended = saved.clone();
        history
            .expect_append()
            .with(eq("alice"), mockall::predicate::always())
            .times(1)
            .returning(move |_, record| {
                appended.lock().unwrap().push(record.clone());
                let id = record.id;
                Box::pin(async move { Ok(id) })
            });
        let listed = saved.clone();
        history.expect_list().returning(move |_| {
            let records = listed.lock().unwrap().clone();
            Box::pin(async move { Ok(records) })
        });

        let service = service(history, recognition, storage_accepting_puts());

        let outcome = service
            .upload_meal(upload_input(Some("alice"), b"jpeg"))
            .await
            .unwrap();

        assert!(outcome.saved_to_history);
        assert_eq!(outcome.recognition, RecognitionStatus::Completed);
        assert_eq!(outcome.message, None);
        assert_eq!(outcome.record.foods, vec!["kimbap".to_string()]);
        assert_eq!(outcome.record.nutrition.calories, 480.0);
        assert_eq!(outcome.record.raw_detections.len(), 2);
        assert!(outcome.record.image_path.starts_with("http://minio:9000/meallog-uploads/alice/"));
        assert!(outcome.record.image_path.ends_with("-lunch.jpg"));

        let summary = outcome.summary.unwrap();
        assert_eq!(summary.meal_count, 1);
        assert_eq!(summary.daily_totals.carbs, 70.0);
    }

    #[tokio::test]
    async fn upload_survives_unreachable_recognition() {
        let mut recognition = MockRecognitionClient::new();
        recognition
            .expect_analyze()
            .returning(|_| Box::pin(async { RecognitionResult::unavailable("timed out") }));

        let mut history = MockMealHistoryRepository::new();
        history
            .expect_append()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(Uuid::now_v7()) }));
        history
            .expect_list()
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let service = service(history, recognition, storage_accepting_puts());

        let outcome = service
            .upload_meal(upload_input(Some("alice"), b"jpeg"))
            .await
            .unwrap();

        assert!(outcome.saved_to_history);
        assert_eq!(outcome.recognition, RecognitionStatus::Unavailable);
        assert_eq!(
            outcome.message.as_deref(),
            Some(RECOGNITION_UNAVAILABLE_MESSAGE)
        );
        assert_eq!(outcome.record.nutrition, NutrientVector::ZERO);
        assert!(outcome.record.foods.is_empty());
        assert!(outcome.meal_gauges.iter().all(|gauge| gauge.percentage == 0));
    }

    #[tokio::test]
    async fn anonymous_upload_is_never_recorded() {
        let mut recognition = MockRecognitionClient::new();
        recognition
            .expect_analyze()
            .returning(|_| Box::pin(async { RecognitionResult::completed(vec![kimbap()]) }));

        let mut history = MockMealHistoryRepository::new();
        history.expect_append().never();
        history.expect_list().never();

        let service = service(history, recognition, storage_accepting_puts());

        let outcome = service
            .upload_meal(upload_input(None, b"jpeg"))
            .await
            .unwrap();

        assert!(!outcome.saved_to_history);
        assert!(outcome.summary.is_none());
        assert_eq!(outcome.record.foods, vec!["kimbap".to_string()]);
        assert!(outcome.record.image_path.contains("/anonymous/"));
    }

    #[tokio::test]
    async fn store_failure_still_returns_analysis() {
        let mut recognition = MockRecognitionClient::new();
        recognition
            .expect_analyze()
            .returning(|_| Box::pin(async { RecognitionResult::completed(vec![kimbap()]) }));

        let mut history = MockMealHistoryRepository::new();
        history.expect_append().returning(|_, _| {
            Box::pin(async { Err(CoreError::StoreUnavailable("connection reset".to_string())) })
        });
        history.expect_list().never();

        let service = service(history, recognition, storage_accepting_puts());

        let outcome = service
            .upload_meal(upload_input(Some("alice"), b"jpeg"))
            .await
            .unwrap();

        assert!(!outcome.saved_to_history);
        assert!(outcome.summary.is_none());
        assert_eq!(outcome.record.nutrition.protein, 14.0);
    }

    #[tokio::test]
    async fn failure_after_write_removes_object() {
        let deleted = Arc::new(AtomicBool::new(false));

        let mut storage = MockObjectStoragePort::new();
        storage
            .expect_put_object()
            .returning(|_, _, _, _| Box::pin(async { Ok(()) }));
        storage
            .expect_object_url()
            .returning(|_, _| Err(CoreError::InternalServerError));
        let flag = deleted.clone();
        storage
            .expect_delete_object()
            .times(1)
            .returning(move |bucket, key| {
                assert_eq!(bucket, BUCKET);
                assert!(key.starts_with("alice/"));
                flag.store(true, Ordering::SeqCst);
                Box::pin(async { Ok(()) })
            });

        let mut recognition = MockRecognitionClient::new();
        recognition.expect_analyze().never();

        let service = service(MockMealHistoryRepository::new(), recognition, storage);

        let result = service
            .upload_meal(upload_input(Some("alice"), b"jpeg"))
            .await;

        assert_eq!(result, Err(CoreError::InternalServerError));
        assert!(deleted.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn storage_write_failure_is_reported() {
        let mut storage = MockObjectStoragePort::new();
        storage.expect_put_object().returning(|_, _, _, _| {
            Box::pin(async { Err(CoreError::ObjectStorageError("bucket missing".to_string())) })
        });
        storage.expect_delete_object().never();

        let service = service(
            MockMealHistoryRepository::new(),
            MockRecognitionClient::new(),
            storage,
        );

        let result = service
            .upload_meal(upload_input(Some("alice"), b"jpeg"))
            .await;

        assert!(matches!(result, Err(CoreError::ObjectStorageError(_))));
    }

    #[tokio::test]
    async fn anonymous_history_is_empty() {
        let mut history = MockMealHistoryRepository::new();
        history.expect_list().never();

        let service = service(history, MockRecognitionClient::new(), MockObjectStoragePort::new());

        assert_eq!(service.get_history("anonymous".to_string()).await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn history_read_failure_propagates() {
        let mut history = MockMealHistoryRepository::new();
        history.expect_list().returning(|_| {
            Box::pin(async { Err(CoreError::StoreUnavailable("down".to_string())) })
        });

        let service = service(history, MockRecognitionClient::new(), MockObjectStoragePort::new());

        let result = service.get_history("alice".to_string()).await;
        assert!(matches!(result, Err(CoreError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn summary_for_user_without_meals() {
        let mut history = MockMealHistoryRepository::new();
        history
            .expect_list()
            .with(eq("bob"))
            .returning(|_| Box::pin(async { Ok(Vec::new()) }));

        let service = service(history, MockRecognitionClient::new(), MockObjectStoragePort::new());

        let summary = service
            .get_nutrition_summary(GetNutritionSummaryInput {
                user_id: "bob".to_string(),
                now: Utc::now().fixed_offset(),
            })
            .await
            .unwrap();

        assert_eq!(summary.meal_count, 0);
        assert_eq!(summary.daily_totals, NutrientVector::ZERO);
        assert!(summary.all_time_average.is_none());
        assert!(summary.supplement_recommendations.is_empty());
    }

    #[tokio::test]
    async fn images_are_filtered_and_sorted_newest_first() {
        let mut storage = MockObjectStoragePort::new();
        storage
            .expect_list_objects()
            .with(eq(BUCKET), eq("alice/"))
            .returning(|_, _| {
                Box::pin(async {
                    Ok(vec![
                        ObjectSummary {
                            object_key: "alice/1000-old.JPG".to_string(),
                            size_bytes: 10,
                            last_modified: Some(Utc.timestamp_opt(1_000, 0).unwrap()),
                        },
                        ObjectSummary {
                            object_key: "alice/notes.txt".to_string(),
                            size_bytes: 3,
                            last_modified: Some(Utc.timestamp_opt(3_000, 0).unwrap()),
                        },
                        ObjectSummary {
                            object_key: "alice/2000-new.webp".to_string(),
                            size_bytes: 20,
                            last_modified: Some(Utc.timestamp_opt(2_000, 0).unwrap()),
                        },
                    ])
                })
            });
        storage
            .expect_object_url()
            .returning(|bucket, key| Ok(format!("http://minio:9000/{bucket}/{key}")));

        let service = service(MockMealHistoryRepository::new(), MockRecognitionClient::new(), storage);

        let images = service.list_images("alice".to_string()).await.unwrap();

        let names: Vec<_> = images.iter().map(|image| image.filename.as_str()).collect();
        assert_eq!(names, vec!["2000-new.webp", "1000-old.JPG"]);
        assert_eq!(
            images[0].url,
            "http://minio:9000/meallog-uploads/alice/2000-new.webp"
        );
    }
}
