pub mod rekognition_face_detector;
