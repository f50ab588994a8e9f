//! Starter catalogue for empty deployments.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{CourseRepository, CourseRepositoryError};
use crate::domain::{CourseDraft, CourseFields, CourseId};

struct SampleCourse {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    credits: i64,
    instructor: &'static str,
    capacity: i64,
}

const SAMPLE_COURSES: [SampleCourse; 5] = [
    SampleCourse {
        code: "CS101",
        name: "Introduction to Computer Science",
        description: "Fundamental concepts of computer science and programming",
        credits: 3,
        instructor: "Dr. Smith",
        capacity: 30,
    },
    SampleCourse {
        code: "CS201",
        name: "Data Structures and Algorithms",
        description: "Advanced programming concepts, data structures, and algorithms",
        credits: 4,
        instructor: "Dr. Johnson",
        capacity: 25,
    },
    SampleCourse {
        code: "MATH101",
        name: "Calculus I",
        description: "Introduction to differential and integral calculus",
        credits: 4,
        instructor: "Prof. Williams",
        capacity: 40,
    },
    SampleCourse {
        code: "ENG101",
        name: "English Composition",
        description: "Academic writing and critical thinking",
        credits: 3,
        instructor: "Prof. Davis",
        capacity: 20,
    },
    SampleCourse {
        code: "PHYS101",
        name: "Physics I",
        description: "Mechanics, waves, and thermodynamics",
        credits: 4,
        instructor: "Dr. Brown",
        capacity: 35,
    },
];

impl SampleCourse {
    fn fields(&self) -> CourseFields {
        CourseFields {
            code: self.code.to_owned(),
            name: self.name.to_owned(),
            description: self.description.to_owned(),
            credits: self.credits,
            instructor: self.instructor.to_owned(),
            capacity: self.capacity,
            active: true,
        }
    }
}

/// Seeds the sample catalogue into an empty course store.
pub struct SampleCourseSeeder<C> {
    courses: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> SampleCourseSeeder<C>
where
    C: CourseRepository,
{
    /// Create a seeder over the course store.
    pub fn new(courses: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { courses, clock }
    }

    /// Insert the sample courses when the store holds none.
    ///
    /// Returns how many courses were inserted. Codes inserted concurrently by
    /// another instance are skipped.
    pub async fn seed_if_empty(&self) -> Result<usize, CourseRepositoryError> {
        if self.courses.counts().await?.total > 0 {
            debug!("course store not empty; skipping sample catalogue");
            return Ok(0);
        }

        let now = self.clock.utc();
        let mut inserted = 0;
        for sample in &SAMPLE_COURSES {
            let draft = CourseDraft::try_new(sample.fields())
                .map_err(|err| CourseRepositoryError::query(err.to_string()))?;
            match self.courses.insert(&draft.into_course(CourseId::random(), now)).await {
                Ok(()) => inserted += 1,
                Err(CourseRepositoryError::DuplicateCode { code }) => {
                    debug!(%code, "sample course already present");
                }
                Err(other) => return Err(other),
            }
        }
        info!(inserted, "seeded sample catalogue");
        Ok(inserted)
    }
}
